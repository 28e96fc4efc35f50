//! Transformation prompt construction.

/// Build the fixed transformation prompt around the user's description.
///
/// The template instructs the provider to keep the subject recognizable and
/// only change body composition, and to render a result that reads as a
/// real photograph rather than an edited one.
#[must_use]
pub fn transformation_prompt(description: &str) -> String {
    format!(
        "Transform the person in this photo to have the following physique: {description}. \
         Keep the same face, identity, pose, clothing, and background. \
         Change only the body composition and muscle definition. \
         The result must be photorealistic and must not look like an edited image."
    )
}

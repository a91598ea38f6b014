use uuid::Uuid;

/// Produces provider-side names for templates and campaigns.
pub trait NameGenerator: Send + Sync {
    fn next(&self, prefix: &str) -> String;
}

/// Random v4 UUIDs, so concurrent sends within the same second never collide.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNameGenerator;

impl NameGenerator for UuidNameGenerator {
    fn next(&self, prefix: &str) -> String {
        format!("{prefix}{}", Uuid::new_v4().simple())
    }
}

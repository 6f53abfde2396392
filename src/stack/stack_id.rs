crate::define_id_enum_with_display! {
    /// Base image family the application is built for
    StackId {
        Bionic => "io.buildpacks.stacks.bionic" : "bionic" | "base" | "full",
        Tiny => "io.paketo.stacks.tiny" : "tiny",
    }
}

/// Extra compiler flag required on the tiny stack, which ships no full libc
pub const TINY_STACK_FLAG: &str = "-H:+StaticExecutableWithDynamicLibC";

impl StackId {
    /// Compiler flags this stack needs in addition to the caller's arguments
    pub fn compiler_flags(&self) -> &'static [&'static str] {
        match self {
            StackId::Tiny => &[TINY_STACK_FLAG],
            _ => &[],
        }
    }
}

impl Default for StackId {
    fn default() -> Self {
        StackId::Bionic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(StackId::from_id("io.paketo.stacks.tiny"), StackId::Tiny);
        assert_eq!(
            StackId::from_id("io.buildpacks.stacks.bionic"),
            StackId::Bionic
        );
        assert_eq!(
            StackId::from_id("io.buildpacks.stacks.jammy"),
            StackId::Custom("io.buildpacks.stacks.jammy".to_string())
        );
    }

    #[test]
    fn test_from_str_accepts_names_and_ids() {
        assert_eq!("tiny".parse::<StackId>().unwrap(), StackId::Tiny);
        assert_eq!("base".parse::<StackId>().unwrap(), StackId::Bionic);
        assert_eq!(
            "io.paketo.stacks.tiny".parse::<StackId>().unwrap(),
            StackId::Tiny
        );
        assert_eq!(
            "org.example.stack".parse::<StackId>().unwrap(),
            StackId::Custom("org.example.stack".to_string())
        );
    }

    #[test]
    fn test_only_tiny_needs_flag() {
        assert_eq!(StackId::Tiny.compiler_flags(), &[TINY_STACK_FLAG]);
        assert!(StackId::Bionic.compiler_flags().is_empty());
        assert!(StackId::Custom("x".to_string()).compiler_flags().is_empty());
    }

    #[test]
    fn test_serde_uses_full_id() {
        assert_eq!(
            serde_json::to_string(&StackId::Tiny).unwrap(),
            "\"io.paketo.stacks.tiny\""
        );
        let custom: StackId = serde_json::from_str("\"io.buildpacks.stacks.jammy\"").unwrap();
        assert_eq!(custom.name(), "io.buildpacks.stacks.jammy");
    }

    #[test]
    fn test_display() {
        assert_eq!(StackId::Tiny.to_string(), "io.paketo.stacks.tiny");
        assert_eq!(StackId::Bionic.name(), "bionic");
        assert_eq!(StackId::all_variants().len(), 2);
    }
}

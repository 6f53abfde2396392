//! Native-support dependency detection

const NATIVE_SUPPORT_PREFIXES: [&str; 2] = ["spring-native-", "spring-graalvm-native-"];

/// True when the final `/`-separated segment of `entry` names a native-support jar
pub fn is_native_support(entry: &str) -> bool {
    let file_name = entry.rsplit('/').next().unwrap_or(entry);
    file_name.ends_with(".jar")
        && NATIVE_SUPPORT_PREFIXES
            .iter()
            .any(|prefix| file_name.starts_with(prefix))
}

/// True when any index entry is a native-support jar
pub fn has_native_support<S: AsRef<str>>(entries: &[S]) -> bool {
    entries.iter().any(|entry| is_native_support(entry.as_ref()))
}

pub fn get_version_string() -> String {
    format!(
        "{} {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COUNT"),
        env!("GIT_HASH")
    )
}

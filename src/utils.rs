// src/utils.rs

/// Escape text placed in the data part of a workflow command
pub fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Case-insensitive comparison of GitHub logins
pub fn same_login(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

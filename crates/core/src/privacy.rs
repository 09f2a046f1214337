/// Obscure an email address for log output.
///
/// Keeps the first character of the local part and the full domain, so log
/// lines stay useful for routing issues without exposing the recipient.
///
/// ```
/// use mailgate_core::obscure_email;
///
/// assert_eq!(obscure_email("alice@example.com"), "a***@example.com");
/// assert_eq!(obscure_email("not-an-address"), "***");
/// ```
pub fn obscure_email(address: &str) -> String {
    let Some((local, domain)) = address.trim().rsplit_once('@') else {
        return "***".to_owned();
    };
    match local.chars().next() {
        Some(first) if !domain.is_empty() => format!("{first}***@{domain}"),
        _ => "***".to_owned(),
    }
}

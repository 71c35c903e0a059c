// src/classifier/sender.rs
//! Layer 2: sender address checks. Exact domain match, prefix match on the local part.

/// Splits on the last `@`. No `@` means no local part and no domain.
fn split_address(email: &str) -> Option<(&str, &str)> {
    email.rsplit_once('@')
}

/// Exact, case-insensitive match of the address domain. `notmailinator.com`
/// does not match `mailinator.com`, and neither does `sub.mailinator.com`.
pub fn is_blocked_domain<'a>(email: &str, blocked: &'a [String]) -> Option<&'a str> {
    let (_, domain) = split_address(email)?;
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return None;
    }
    blocked
        .iter()
        .find(|b| b.to_lowercase() == domain)
        .map(String::as_str)
}

/// Local part starts with a blocked prefix (`noreply`, `no-reply`, ...).
pub fn blocked_prefix<'a>(email: &str, prefixes: &'a [String]) -> Option<&'a str> {
    let (local, _) = split_address(email)?;
    let local = local.trim().to_lowercase();
    prefixes
        .iter()
        .find(|p| !p.is_empty() && local.starts_with(&p.to_lowercase()))
        .map(String::as_str)
}

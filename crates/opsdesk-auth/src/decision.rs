//! the privilege decision: role → privileges → feature → HTTP verb.
//!
//! pure functions over already-resolved privilege data, so the same logic is
//! trivially testable and the HTTP/database plumbing stays in the server
//! crate.

/// the privilege bit an HTTP method requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeFlag {
    /// POST.
    Create,
    /// GET.
    Read,
    /// PATCH and PUT.
    Update,
    /// DELETE.
    Delete,
}

/// one resolved privilege row: the feature name plus the four bits.
#[derive(Debug, Clone)]
pub struct PrivilegeRow {
    /// feature/route namespace this row governs.
    pub feature: String,
    /// may create.
    pub can_create: bool,
    /// may read.
    pub can_read: bool,
    /// may update.
    pub can_update: bool,
    /// may delete.
    pub can_delete: bool,
}

/// map an HTTP method to the privilege bit it requires.
///
/// unknown methods map to `None` and must be denied by the caller.
pub fn required_flag(method: &str) -> Option<PrivilegeFlag> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Some(PrivilegeFlag::Read),
        "POST" => Some(PrivilegeFlag::Create),
        "PATCH" | "PUT" => Some(PrivilegeFlag::Update),
        "DELETE" => Some(PrivilegeFlag::Delete),
        _ => None,
    }
}

/// decide whether a privilege set allows `flag` on `feature`.
///
/// feature names match case-insensitively; a missing row denies.
pub fn allows(privileges: &[PrivilegeRow], feature: &str, flag: PrivilegeFlag) -> bool {
    privileges
        .iter()
        .find(|p| p.feature.eq_ignore_ascii_case(feature))
        .is_some_and(|p| match flag {
            PrivilegeFlag::Create => p.can_create,
            PrivilegeFlag::Read => p.can_read,
            PrivilegeFlag::Update => p.can_update,
            PrivilegeFlag::Delete => p.can_delete,
        })
}

/// resource namespaces that bypass the privilege check once the token and
/// revocation checks have passed.
pub fn is_public_feature(feature: &str) -> bool {
    feature.eq_ignore_ascii_case("auth")
}

/// the stricter administrative check used by delete gating.
pub fn is_admin_role(role_name: &str, admin_roles: &[String]) -> bool {
    admin_roles.iter().any(|r| r == role_name)
}

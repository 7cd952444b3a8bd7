//! ACL resolution: from a user's roles to access tags

use roomgate_api::{RoleCategory, User, UserRole};
use roomgate_config::AclTables;
use tracing::warn;

/// Resolves roles against the static access tables
#[derive(Debug, Clone, Copy)]
pub struct AclResolver<'a> {
    tables: &'a AclTables,
}

impl<'a> AclResolver<'a> {
    pub fn new(tables: &'a AclTables) -> Self {
        Self { tables }
    }

    /// Assign each role its category. Run once when roles are ingested.
    pub fn classify_roles(&self, roles: &mut [UserRole]) {
        for role in roles {
            role.category = if self.tables.is_ignorable_role(role.id) {
                RoleCategory::BookingOnly
            } else {
                RoleCategory::Standard
            };
        }
    }

    /// Group code reduced to its table key: everything from the first
    /// digit on is cut, then one trailing hyphen and the locale prefixes.
    pub fn group_prefix<'g>(&self, student_group: &'g str) -> &'g str {
        let cut = student_group
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(student_group.len());
        let mut prefix = &student_group[..cut];
        prefix = prefix.strip_suffix('-').unwrap_or(prefix);

        for locale in self.tables.locale_prefixes() {
            prefix = prefix.strip_prefix(locale.as_str()).unwrap_or(prefix);
        }

        prefix
    }

    /// Tags granted by one role; empty for booking-only and unmapped roles
    pub fn tags(&self, role: &UserRole) -> &'a [String] {
        if role.is_ignorable() {
            return &[];
        }

        self.tables
            .tags_for_prefix(self.group_prefix(&role.student_group))
            .unwrap_or(&[])
    }

    /// Tag required by a normalized room code
    pub fn room_tag(&self, only_code: &str) -> Option<&'a str> {
        self.tables.room_tag(only_code)
    }

    /// Union of the tags of all roles, first occurrence order
    pub fn tag_union(&self, roles: &[UserRole]) -> Vec<&'a str> {
        let mut union: Vec<&'a str> = Vec::new();
        for tag in roles.iter().flat_map(|r| self.tags(r)) {
            if !union.contains(&tag.as_str()) {
                union.push(tag);
            }
        }
        union
    }

    /// Comma-joined student groups of the non-ignorable roles.
    ///
    /// Role order is significant unless the tables ask for sorted identities.
    pub fn composite_identity(&self, roles: &[UserRole]) -> String {
        let mut groups: Vec<&str> = roles
            .iter()
            .filter(|r| !r.is_ignorable())
            .map(|r| r.student_group.as_str())
            .collect();

        if self.tables.sorted_identity() {
            groups.sort_unstable();
        }

        groups.join(",")
    }

    /// One advisory per non-ignorable role whose group has no table entry
    pub fn unknown_groups(&self, user: &User, admin_contact: &str) -> Vec<String> {
        let contact = if admin_contact.is_empty() {
            "administraatorile"
        } else {
            admin_contact
        };

        user.roles
            .iter()
            .filter(|r| !r.is_ignorable() && self.tags(r).is_empty())
            .map(|role| {
                warn!(
                    student_group = %role.student_group,
                    user = %user.full_name,
                    "Unknown ACL group"
                );
                format!(
                    "Kasutaja roll {} on kaardistamata õigustega. Palun kirjuta {}, et filtreerida enda õigustega ruume.",
                    role.student_group, contact
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> AclTables {
        AclTables::default()
            .with_group("KJ", &["general", "classical", "practice"])
            .with_group("LP", &["general", "classical", "practice", "percussion"])
            .with_locale_prefix("eõ-")
            .with_locale_prefix("JÕ-")
            .with_ignorable_role(223113)
    }

    fn role(id: i64, group: &str) -> UserRole {
        UserRole {
            id,
            school_code: "MUBA".into(),
            role: "ROLL_T".into(),
            student_group: group.into(),
            category: RoleCategory::Standard,
        }
    }

    fn user(roles: Vec<UserRole>) -> User {
        User {
            id_code: "39001010000".into(),
            user_id: 1,
            person_id: 2,
            full_name: "Mari Maasikas".into(),
            roles,
            session_timeout_in_seconds: 10800,
        }
    }

    #[test]
    fn test_group_prefix() {
        let tables = tables();
        let acl = AclResolver::new(&tables);

        assert_eq!(acl.group_prefix("KJ-21"), "KJ");
        assert_eq!(acl.group_prefix("KJ21"), "KJ");
        assert_eq!(acl.group_prefix("eõ-LP-22"), "LP");
        assert_eq!(acl.group_prefix("JÕ-KJ-1"), "KJ");
        assert_eq!(acl.group_prefix("RM(MP)-20"), "RM(MP)");
        assert_eq!(acl.group_prefix("KL"), "KL");
        assert_eq!(acl.group_prefix(""), "");
    }

    #[test]
    fn test_group_prefix_cuts_at_ascii_digits_only() {
        let tables = tables();
        let acl = AclResolver::new(&tables);

        assert_eq!(acl.group_prefix("KL²-1"), "KL²");
        assert_eq!(acl.group_prefix("KLⅫ"), "KLⅫ");
    }

    #[test]
    fn test_classify_roles() {
        let tables = tables();
        let acl = AclResolver::new(&tables);
        let mut roles = vec![role(1, "KJ-21"), role(223113, "")];

        acl.classify_roles(&mut roles);
        assert_eq!(roles[0].category, RoleCategory::Standard);
        assert_eq!(roles[1].category, RoleCategory::BookingOnly);
    }

    #[test]
    fn test_tags() {
        let tables = tables();
        let acl = AclResolver::new(&tables);
        let mut roles = vec![role(1, "KJ-21"), role(2, "MM-19"), role(223113, "KJ-21")];
        acl.classify_roles(&mut roles);

        assert_eq!(acl.tags(&roles[0]).len(), 3);
        assert!(acl.tags(&roles[1]).is_empty());
        // Booking-only roles grant nothing even with a mapped group
        assert!(acl.tags(&roles[2]).is_empty());
    }

    #[test]
    fn test_tag_union_deduplicates() {
        let tables = tables();
        let acl = AclResolver::new(&tables);
        let roles = vec![role(1, "KJ-21"), role(2, "LP-22")];

        assert_eq!(
            acl.tag_union(&roles),
            vec!["general", "classical", "practice", "percussion"]
        );
    }

    #[test]
    fn test_composite_identity_keeps_order() {
        let tables = tables();
        let acl = AclResolver::new(&tables);
        let mut roles = vec![role(1, "LP-22"), role(223113, "X"), role(2, "KJ-21")];
        acl.classify_roles(&mut roles);

        assert_eq!(acl.composite_identity(&roles), "LP-22,KJ-21");
        assert_eq!(acl.composite_identity(&roles), acl.composite_identity(&roles.clone()));

        roles.reverse();
        assert_eq!(acl.composite_identity(&roles), "KJ-21,LP-22");
        assert_eq!(acl.composite_identity(&[]), "");
    }

    #[test]
    fn test_composite_identity_sorted() {
        let tables = tables().with_sorted_identity(true);
        let acl = AclResolver::new(&tables);
        let forward = vec![role(1, "LP-22"), role(2, "KJ-21")];
        let backward = vec![role(2, "KJ-21"), role(1, "LP-22")];

        assert_eq!(acl.composite_identity(&forward), "KJ-21,LP-22");
        assert_eq!(acl.composite_identity(&forward), acl.composite_identity(&backward));
    }

    #[test]
    fn test_unknown_groups() {
        let tables = tables();
        let acl = AclResolver::new(&tables);
        let mut u = user(vec![role(1, "KJ-21"), role(2, "MM-19"), role(223113, "")]);
        acl.classify_roles(&mut u.roles);

        let messages = acl.unknown_groups(&u, "admin@example.org");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("MM-19"));
        assert!(messages[0].contains("admin@example.org"));
    }
}

//! FamilySearch-only state kinds.
//!
//! These implement [`StateKind`] from `gx-client`; their operations are
//! extension traits in [`crate::states`].

use gx_client::{StateKind, StateName};
use gx_core::{media, StatusCode};
use gx_model::{Feed, Gedcomx, HasLinks};

/// Entity-status policy of Family Tree resources: deleted (410) and
/// conflicting (412) resources still return their representation.
pub fn tree_entity_expected(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::GONE || status == StatusCode::PRECONDITION_FAILED
}

macro_rules! fs_kind {
    ($(#[$doc:meta])* $name:ident $(, scope = $field:ident)? $(, policy = $policy:path)?) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl StateKind for $name {
            const NAME: StateName = StateName::$name;
            const MEDIA_TYPE: &'static str = media::FAMILYSEARCH_JSON;
            type Entity = Gedcomx;

            $(
                fn entity_expected(status: StatusCode) -> bool {
                    $policy(status)
                }
            )?

            $(
                fn scope(entity: &Gedcomx) -> Option<&dyn HasLinks> {
                    entity.$field.first().map(|s| s as &dyn HasLinks)
                }
            )?
        }
    };
}

macro_rules! fs_feed_kind {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl StateKind for $name {
            const NAME: StateName = StateName::$name;
            const MEDIA_TYPE: &'static str = media::ATOM_JSON;
            type Entity = Feed;
        }
    };
}

fs_kind!(
    /// A child with its father and mother; deleted ones still parse.
    ChildAndParentsRelationship,
    scope = child_and_parents_relationships,
    policy = tree_entity_expected
);
fs_feed_kind!(
    /// The change log of a tree resource.
    ChangeHistory
);
fs_kind!(
    /// A discussion; scope is the first discussion.
    Discussion,
    scope = discussions
);
fs_kind!(
    /// A list of discussions.
    Discussions
);
fs_kind!(
    /// The authenticated user.
    User,
    scope = users
);
fs_feed_kind!(
    /// Possible duplicates of a person.
    PersonMatchResults
);
fs_kind!(
    /// A merge analysis between a survivor and a duplicate.
    PersonMerge
);
fs_kind!(
    /// Persons declared not to be duplicates of a person.
    PersonNonMatches
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_policy_parses_gone_and_conflict() {
        assert!(tree_entity_expected(StatusCode::OK));
        assert!(tree_entity_expected(StatusCode::GONE));
        assert!(tree_entity_expected(StatusCode::PRECONDITION_FAILED));
        assert!(!tree_entity_expected(StatusCode::NOT_FOUND));
        assert!(!tree_entity_expected(StatusCode::NO_CONTENT));
    }

    #[test]
    fn kinds_carry_their_media_type_and_policy() {
        assert_eq!(ChildAndParentsRelationship::MEDIA_TYPE, media::FAMILYSEARCH_JSON);
        assert!(ChildAndParentsRelationship::entity_expected(StatusCode::GONE));
        assert!(!Discussion::entity_expected(StatusCode::GONE));
        assert_eq!(ChangeHistory::MEDIA_TYPE, media::ATOM_JSON);
        assert_eq!(PersonMatchResults::NAME, StateName::PersonMatchResults);
    }
}

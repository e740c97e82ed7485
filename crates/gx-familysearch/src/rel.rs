//! Link relations FamilySearch adds to the GEDCOM X RS vocabulary.

pub const CHANGE_HISTORY: &str = "change-history";
pub const CHILD: &str = "child";
pub const CHILD_AND_PARENTS_RELATIONSHIPS: &str = "child-and-parents-relationships";
pub const COMMENT: &str = "comment";
pub const COMMENTS: &str = "comments";
pub const CURRENT_USER: &str = "current-user";
pub const DISCUSSION: &str = "discussion";
pub const DISCUSSION_REFERENCE: &str = "discussion-reference";
pub const DISCUSSION_REFERENCES: &str = "discussion-references";
pub const DISCUSSIONS: &str = "discussions";
pub const FATHER: &str = "father";
pub const FATHER_ROLE: &str = "father-role";
pub const MATCHES: &str = "matches";
pub const MERGE: &str = "merge";
pub const MOTHER: &str = "mother";
pub const MOTHER_ROLE: &str = "mother-role";
pub const NON_MATCHES: &str = "non-matches";
pub const NOT_A_MATCH: &str = "not-a-match";
pub const PERSON_WITH_RELATIONSHIPS: &str = "person-with-relationships";
pub const RESTORE: &str = "restore";

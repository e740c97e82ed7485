//! # Discussion States
//!
//! A discussion is a titled thread of comments attached to persons through
//! discussion references. Comments are loaded separately through the
//! `comments` link and merged into the discussion by comment id.

use gx_client::{Result, StateTransitionOption};
use gx_core::{rel as gx_rel, Method};
use gx_model::{Comment, Discussion, Gedcomx, HasLinks};

use super::{fs_request, DiscussionState, DiscussionsState};
use crate::{kind, rel};

/// Operations on a single discussion.
pub trait DiscussionStateExt: Sized {
    fn discussion(&self) -> Option<&Discussion>;

    /// Comments loaded so far; empty until [`load_comments`](Self::load_comments).
    fn comments(&self) -> &[Comment];

    fn load_comments(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    fn add_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    /// Send an edited comment; the comment must carry its id.
    fn update_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    fn delete_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    /// Replace the title and details of this discussion.
    fn update(&self, discussion: &Discussion, options: &[&dyn StateTransitionOption]) -> Result<Self>;
}

/// Operations on a list of discussions.
pub trait DiscussionsStateExt: Sized {
    fn discussions(&self) -> &[Discussion];

    fn read_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<DiscussionState>>;

    fn add_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<DiscussionState>;
}

fn post_comments(
    state: &DiscussionState,
    comments: Vec<Comment>,
    options: &[&dyn StateTransitionOption],
) -> Result<DiscussionState> {
    let discussion = Discussion {
        id: state.discussion().and_then(|d| d.id.clone()),
        comments,
        ..Discussion::default()
    };
    let mut request = fs_request(state, Method::POST, state.target_uri(rel::COMMENTS))?;
    request.set_json_body(&Gedcomx::with_discussion(discussion))?;
    state.transition_same(request, options)
}

impl DiscussionStateExt for DiscussionState {
    fn discussion(&self) -> Option<&Discussion> {
        self.entity().and_then(|g| g.discussions.first())
    }

    fn comments(&self) -> &[Comment] {
        self.discussion().map(|d| d.comments.as_slice()).unwrap_or_default()
    }

    fn load_comments(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::COMMENTS], options)
    }

    fn add_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        post_comments(self, vec![comment.clone()], options)
    }

    fn update_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        post_comments(self, vec![comment.clone()], options)
    }

    fn delete_comment(&self, comment: &Comment, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.delete_linked(comment, rel::COMMENT, options)
    }

    fn update(&self, discussion: &Discussion, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let discussion = Discussion {
            id: self.discussion().and_then(|d| d.id.clone()),
            ..discussion.clone()
        };
        self.post_same(self.self_uri(), &Gedcomx::with_discussion(discussion), options)
    }
}

impl DiscussionsStateExt for DiscussionsState {
    fn discussions(&self) -> &[Discussion] {
        self.entity().map(|g| g.discussions.as_slice()).unwrap_or_default()
    }

    fn read_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<DiscussionState>> {
        match discussion.link(rel::DISCUSSION).or_else(|| discussion.link(gx_rel::SELF)) {
            Some(link) => self.follow_link::<kind::Discussion>(link, options).map(Some),
            None => Ok(None),
        }
    }

    fn add_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<DiscussionState> {
        self.post_to_uri::<kind::Discussion>(self.self_uri(), &Gedcomx::with_discussion(discussion.clone()), options)
    }
}

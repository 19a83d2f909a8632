//! Messaging Traits
//!
//! The messaging surface of the host bot framework, split into two seams: a
//! sender for outgoing messages and a setter for moderation/state actions.
//! The delayed wrappers in [`crate::delayed`] decorate implementations of
//! these traits; the real implementations (platform adapters) live in the
//! embedding application.
//!
//! Send operations that produce a delivery receipt return `Option<String>`;
//! everything else acknowledges with a `bool`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How a group-join request came about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupAddRequestType {
    /// The account was invited into the group
    Invite,
    /// The account applied to join on its own
    Apply,
}

/// Outgoing message operations
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a private message to a user
    ///
    /// Returns a delivery receipt when the platform provides one.
    async fn send_private_msg(&self, user: &str, msg: &str) -> Option<String>;

    /// Send a message to a group
    async fn send_group_msg(&self, group: &str, msg: &str) -> Option<String>;

    /// Send a message to a discussion group
    async fn send_discuss_msg(&self, group: &str, msg: &str) -> Option<String>;

    /// Publish a group notice
    ///
    /// `top`, `to_new_member` and `confirm` are passed through to the
    /// platform; not every platform honors them.
    async fn send_group_notice(
        &self,
        group: &str,
        title: &str,
        text: &str,
        top: bool,
        to_new_member: bool,
        confirm: bool,
    ) -> bool;

    /// Send profile likes to a user, `times` in a row
    async fn send_like(&self, user: &str, times: u32) -> bool;

    /// Send a flower to a group member
    async fn send_flower(&self, group: &str, user: &str) -> bool;
}

/// Moderation and state-changing operations
#[async_trait]
pub trait ActionSetter: Send + Sync {
    /// Mute a group member for `seconds`
    async fn set_group_ban(&self, group: &str, user: &str, seconds: u64) -> bool;

    /// Mute an anonymous group member, identified by `flag`, for `minutes`
    async fn set_group_anonymous_ban(&self, group: &str, flag: &str, minutes: u64) -> bool;

    /// Enable or disable whole-group muting
    async fn set_group_whole_ban(&self, group: &str, enable: bool) -> bool;

    /// Kick a member out of a group
    ///
    /// `reject_requests` also blocks future join requests from them.
    async fn set_group_member_kick(&self, group: &str, user: &str, reject_requests: bool) -> bool;

    /// Promote or demote a group administrator
    async fn set_group_admin(&self, group: &str, user: &str, promote: bool) -> bool;

    /// Allow or forbid anonymous chat in a group
    async fn set_group_anonymous(&self, group: &str, allow: bool) -> bool;

    /// Set a member's group name card
    async fn set_group_card(&self, group: &str, user: &str, card: &str) -> bool;

    /// Grant a member an exclusive title for `minutes`
    async fn set_group_exclusive_title(
        &self,
        group: &str,
        user: &str,
        title: &str,
        minutes: u64,
    ) -> bool;

    /// Leave a group
    ///
    /// When the account owns the group, `dissolve` disbands it instead.
    async fn set_group_leave(&self, group: &str, dissolve: bool) -> bool;

    /// Leave a discussion group
    async fn set_discuss_leave(&self, group: &str) -> bool;

    /// Perform a group sign-in
    async fn set_group_sign(&self, group: &str) -> bool;

    /// Perform the account's daily sign-in
    async fn set_sign(&self) -> bool;

    /// Answer a friend request, identified by `flag`
    ///
    /// When agreeing, `friend_name` becomes the new friend's remark.
    async fn set_friend_add_request(
        &self,
        flag: &str,
        friend_name: Option<&str>,
        agree: bool,
    ) -> bool;

    /// Answer a group-join request, identified by `flag`
    ///
    /// `reason` is the rejection reason when not agreeing.
    async fn set_group_add_request(
        &self,
        flag: &str,
        request_type: GroupAddRequestType,
        agree: bool,
        reason: Option<&str>,
    ) -> bool;

    /// Delete a group file, identified by `flag`
    async fn set_group_file_delete(&self, group: &str, flag: &str) -> bool;

    /// Recall a message, identified by `flag`
    async fn set_msg_recall(&self, flag: &str) -> bool;
}

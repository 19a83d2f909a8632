//! Delayed Messaging Wrappers
//!
//! [`DelaySender`] and [`DelaySetter`] decorate a real [`MessageSender`] /
//! [`ActionSetter`] so that every operation is scheduled through a
//! [`DelayHelper`] instead of running immediately. The wrapped call fires once
//! the configured delay has elapsed; the wrapper itself acknowledges right
//! away with a neutral placeholder - `None` for delivery receipts, `true` for
//! boolean acknowledgements. The real operation's result is discarded.
//!
//! The delay is shared wrapper state and can be adjusted at any time; already
//! scheduled operations keep the delay they were scheduled with.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::helper::{DelayError, DelayHelper, TimeUnit};
use crate::messaging::{ActionSetter, GroupAddRequestType, MessageSender};

// =============================================================================
// Adjustable delay
// =============================================================================

/// A delay that can be adjusted after construction
///
/// Stored as whole milliseconds behind an atomic, so readers on the
/// scheduling path never block and writers never tear a value.
#[derive(Debug)]
pub struct AdjustableDelay {
    /// Current delay in milliseconds
    millis: AtomicU64,
}

impl AdjustableDelay {
    /// Create a delay of `time` in the given unit
    #[must_use]
    pub fn new(time: u64, unit: TimeUnit) -> Self {
        Self::from_duration(unit.to_duration(time))
    }

    /// Create a delay from a [`Duration`]
    ///
    /// Sub-millisecond precision is dropped; durations beyond `u64`
    /// milliseconds are clamped.
    #[must_use]
    pub fn from_duration(delay: Duration) -> Self {
        Self {
            millis: AtomicU64::new(Self::clamp_millis(delay)),
        }
    }

    /// Replace the delay with `time` in the given unit
    pub fn set(&self, time: u64, unit: TimeUnit) {
        self.millis
            .store(Self::clamp_millis(unit.to_duration(time)), Ordering::SeqCst);
    }

    /// The current delay
    #[must_use]
    pub fn get(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }

    fn clamp_millis(delay: Duration) -> u64 {
        u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// DelaySender
// =============================================================================

/// A [`MessageSender`] that delays every send
///
/// Wraps a real sender and schedules each operation through a
/// [`DelayHelper`]. Each method returns its placeholder immediately:
/// `None` for receipt-returning sends, `true` for boolean sends.
pub struct DelaySender<S> {
    /// The sender the delayed calls go to
    inner: Arc<S>,
    /// Scheduler the calls are deferred through
    helper: Arc<DelayHelper>,
    /// Current delay applied to new operations
    delay: AdjustableDelay,
}

impl<S> DelaySender<S>
where
    S: MessageSender + 'static,
{
    /// Wrap `inner` with the shared delay helper and a delay of `time` in `unit`
    ///
    /// # Errors
    ///
    /// [`DelayError::SingletonUnavailable`] if the shared helper is not
    /// constructible (see [`DelayHelper::shared`]).
    pub fn new(inner: Arc<S>, time: u64, unit: TimeUnit) -> Result<Self, DelayError> {
        Ok(Self::with_helper(
            DelayHelper::shared()?,
            inner,
            unit.to_duration(time),
        ))
    }

    /// Wrap `inner` with an explicit helper and delay
    #[must_use]
    pub fn with_helper(helper: Arc<DelayHelper>, inner: Arc<S>, delay: Duration) -> Self {
        Self {
            inner,
            helper,
            delay: AdjustableDelay::from_duration(delay),
        }
    }

    /// The current delay applied to new operations
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay.get()
    }

    /// Adjust the delay for operations scheduled from now on
    pub fn set_delay(&self, time: u64, unit: TimeUnit) {
        self.delay.set(time, unit);
    }

    /// The wrapped sender
    #[must_use]
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Schedule a deferred call against the wrapped sender
    fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let _detached = self.helper.launch(self.delay.get(), task);
    }
}

impl<S> fmt::Debug for DelaySender<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelaySender")
            .field("delay", &self.delay.get())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S> MessageSender for DelaySender<S>
where
    S: MessageSender + 'static,
{
    async fn send_private_msg(&self, user: &str, msg: &str) -> Option<String> {
        let inner = Arc::clone(&self.inner);
        let user = user.to_owned();
        let msg = msg.to_owned();
        self.schedule(async move {
            inner.send_private_msg(&user, &msg).await;
        });
        None
    }

    async fn send_group_msg(&self, group: &str, msg: &str) -> Option<String> {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let msg = msg.to_owned();
        self.schedule(async move {
            inner.send_group_msg(&group, &msg).await;
        });
        None
    }

    async fn send_discuss_msg(&self, group: &str, msg: &str) -> Option<String> {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let msg = msg.to_owned();
        self.schedule(async move {
            inner.send_discuss_msg(&group, &msg).await;
        });
        None
    }

    async fn send_group_notice(
        &self,
        group: &str,
        title: &str,
        text: &str,
        top: bool,
        to_new_member: bool,
        confirm: bool,
    ) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let title = title.to_owned();
        let text = text.to_owned();
        self.schedule(async move {
            inner
                .send_group_notice(&group, &title, &text, top, to_new_member, confirm)
                .await;
        });
        true
    }

    async fn send_like(&self, user: &str, times: u32) -> bool {
        let inner = Arc::clone(&self.inner);
        let user = user.to_owned();
        self.schedule(async move {
            inner.send_like(&user, times).await;
        });
        true
    }

    async fn send_flower(&self, group: &str, user: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        self.schedule(async move {
            inner.send_flower(&group, &user).await;
        });
        true
    }
}

// =============================================================================
// DelaySetter
// =============================================================================

/// An [`ActionSetter`] that delays every action
///
/// Same contract as [`DelaySender`]: every method schedules the real call and
/// acknowledges with `true` immediately.
pub struct DelaySetter<S> {
    /// The setter the delayed calls go to
    inner: Arc<S>,
    /// Scheduler the calls are deferred through
    helper: Arc<DelayHelper>,
    /// Current delay applied to new operations
    delay: AdjustableDelay,
}

impl<S> DelaySetter<S>
where
    S: ActionSetter + 'static,
{
    /// Wrap `inner` with the shared delay helper and a delay of `time` in `unit`
    ///
    /// # Errors
    ///
    /// [`DelayError::SingletonUnavailable`] if the shared helper is not
    /// constructible (see [`DelayHelper::shared`]).
    pub fn new(inner: Arc<S>, time: u64, unit: TimeUnit) -> Result<Self, DelayError> {
        Ok(Self::with_helper(
            DelayHelper::shared()?,
            inner,
            unit.to_duration(time),
        ))
    }

    /// Wrap `inner` with an explicit helper and delay
    #[must_use]
    pub fn with_helper(helper: Arc<DelayHelper>, inner: Arc<S>, delay: Duration) -> Self {
        Self {
            inner,
            helper,
            delay: AdjustableDelay::from_duration(delay),
        }
    }

    /// The current delay applied to new operations
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay.get()
    }

    /// Adjust the delay for operations scheduled from now on
    pub fn set_delay(&self, time: u64, unit: TimeUnit) {
        self.delay.set(time, unit);
    }

    /// The wrapped setter
    #[must_use]
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Schedule a deferred call against the wrapped setter
    fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let _detached = self.helper.launch(self.delay.get(), task);
    }
}

impl<S> fmt::Debug for DelaySetter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelaySetter")
            .field("delay", &self.delay.get())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S> ActionSetter for DelaySetter<S>
where
    S: ActionSetter + 'static,
{
    async fn set_group_ban(&self, group: &str, user: &str, seconds: u64) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        self.schedule(async move {
            inner.set_group_ban(&group, &user, seconds).await;
        });
        true
    }

    async fn set_group_anonymous_ban(&self, group: &str, flag: &str, minutes: u64) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let flag = flag.to_owned();
        self.schedule(async move {
            inner.set_group_anonymous_ban(&group, &flag, minutes).await;
        });
        true
    }

    async fn set_group_whole_ban(&self, group: &str, enable: bool) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        self.schedule(async move {
            inner.set_group_whole_ban(&group, enable).await;
        });
        true
    }

    async fn set_group_member_kick(&self, group: &str, user: &str, reject_requests: bool) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        self.schedule(async move {
            inner
                .set_group_member_kick(&group, &user, reject_requests)
                .await;
        });
        true
    }

    async fn set_group_admin(&self, group: &str, user: &str, promote: bool) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        self.schedule(async move {
            inner.set_group_admin(&group, &user, promote).await;
        });
        true
    }

    async fn set_group_anonymous(&self, group: &str, allow: bool) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        self.schedule(async move {
            inner.set_group_anonymous(&group, allow).await;
        });
        true
    }

    async fn set_group_card(&self, group: &str, user: &str, card: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        let card = card.to_owned();
        self.schedule(async move {
            inner.set_group_card(&group, &user, &card).await;
        });
        true
    }

    async fn set_group_exclusive_title(
        &self,
        group: &str,
        user: &str,
        title: &str,
        minutes: u64,
    ) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let user = user.to_owned();
        let title = title.to_owned();
        self.schedule(async move {
            inner
                .set_group_exclusive_title(&group, &user, &title, minutes)
                .await;
        });
        true
    }

    async fn set_group_leave(&self, group: &str, dissolve: bool) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        self.schedule(async move {
            inner.set_group_leave(&group, dissolve).await;
        });
        true
    }

    async fn set_discuss_leave(&self, group: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        self.schedule(async move {
            inner.set_discuss_leave(&group).await;
        });
        true
    }

    async fn set_group_sign(&self, group: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        self.schedule(async move {
            inner.set_group_sign(&group).await;
        });
        true
    }

    async fn set_sign(&self) -> bool {
        let inner = Arc::clone(&self.inner);
        self.schedule(async move {
            inner.set_sign().await;
        });
        true
    }

    async fn set_friend_add_request(
        &self,
        flag: &str,
        friend_name: Option<&str>,
        agree: bool,
    ) -> bool {
        let inner = Arc::clone(&self.inner);
        let flag = flag.to_owned();
        let friend_name = friend_name.map(ToOwned::to_owned);
        self.schedule(async move {
            inner
                .set_friend_add_request(&flag, friend_name.as_deref(), agree)
                .await;
        });
        true
    }

    async fn set_group_add_request(
        &self,
        flag: &str,
        request_type: GroupAddRequestType,
        agree: bool,
        reason: Option<&str>,
    ) -> bool {
        let inner = Arc::clone(&self.inner);
        let flag = flag.to_owned();
        let reason = reason.map(ToOwned::to_owned);
        self.schedule(async move {
            inner
                .set_group_add_request(&flag, request_type, agree, reason.as_deref())
                .await;
        });
        true
    }

    async fn set_group_file_delete(&self, group: &str, flag: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let group = group.to_owned();
        let flag = flag.to_owned();
        self.schedule(async move {
            inner.set_group_file_delete(&group, &flag).await;
        });
        true
    }

    async fn set_msg_recall(&self, flag: &str) -> bool {
        let inner = Arc::clone(&self.inner);
        let flag = flag.to_owned();
        self.schedule(async move {
            inner.set_msg_recall(&flag).await;
        });
        true
    }
}

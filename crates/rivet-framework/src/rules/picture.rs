//! Picture rules.

use std::time::Duration;

use async_trait::async_trait;
use rivet_core::segment::IMAGE;
use rivet_core::{Context, Message, Segment};
use tracing::{debug, warn};

use super::session::check_session;
use crate::error::WaitError;
use crate::future::{FutureEvent, FutureEvents};
use crate::keys::IMAGE_URL;
use crate::rule::Rule;

/// Default time to wait for the user to send a picture.
pub const DEFAULT_PICTURE_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_PROMPT: &str = "Please send a picture.";

/// Priority of the follow-up wait; high so ordinary waits go first.
const WAIT_PRIORITY: i32 = 999;

/// Passes when the message contains at least one image with a download URL.
///
/// The URLs are stored under `image_url` as a `Vec<String>`.
pub fn has_picture(ctx: &mut Context) -> bool {
    let urls: Vec<String> = ctx
        .event()
        .message
        .iter()
        .filter(|segment| segment.is(IMAGE))
        .map(|segment| segment.field("url"))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return false;
    }
    ctx.state_mut().insert(IMAGE_URL, urls);
    true
}

/// Passes when the message has a picture, or the user sends one in time.
///
/// If the message has no picture, the rule asks for one and waits for the
/// next message from the same user in the same conversation that has one.
/// That message is claimed before normal handlers see it. Its image URLs and
/// message id are copied into the current context.
///
/// ```rust,ignore
/// let rule = MustProvidePicture::new(futures.clone())
///     .with_timeout(Duration::from_secs(60))
///     .with_prompt("Send the image to upscale");
/// ```
#[derive(Debug, Clone)]
pub struct MustProvidePicture {
    futures: FutureEvents,
    timeout: Duration,
    prompt: Message,
}

impl MustProvidePicture {
    pub fn new(futures: FutureEvents) -> Self {
        Self {
            futures,
            timeout: DEFAULT_PICTURE_TIMEOUT,
            prompt: Segment::text(DEFAULT_PROMPT).into(),
        }
    }

    /// Sets how long to wait for the picture.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the message sent to ask for the picture.
    pub fn with_prompt(mut self, prompt: impl Into<Message>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

#[async_trait]
impl Rule for MustProvidePicture {
    async fn check(&self, ctx: &mut Context) -> bool {
        if has_picture(ctx) {
            return true;
        }

        let pending = self.futures.register(
            FutureEvent::new("message", WAIT_PRIORITY, true)
                .rule(check_session(ctx.event()))
                .rule(has_picture),
        );
        if let Err(err) = ctx.bot().send(ctx.event(), self.prompt.clone()).await {
            warn!(error = %err, "failed to send picture prompt");
        }

        match pending.next(self.timeout).await {
            Ok(next) => {
                let message_id = next.event().message_id;
                if let Some(urls) = next.into_state().remove::<Vec<String>>(IMAGE_URL) {
                    ctx.state_mut().insert(IMAGE_URL, urls);
                }
                ctx.event_mut().message_id = message_id;
                true
            }
            Err(WaitError::Timeout) => {
                debug!(user_id = ctx.event().user_id, "no picture provided in time");
                false
            }
            Err(err) => {
                debug!(error = %err, "picture wait ended");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::{MockBot, context, context_with};
    use rivet_core::Event;

    fn picture(url: &str) -> Segment {
        Segment::image_url("f.jpg", url)
    }

    #[tokio::test]
    async fn test_has_picture_collects_urls() {
        let message = vec![
            Segment::text("look"),
            picture("http://a/1.jpg"),
            Segment::image("no-url.jpg"),
            picture("http://a/2.jpg"),
        ];
        let mut ctx = context(Event::private_message(1, message));
        assert!(has_picture.check(&mut ctx).await);
        assert_eq!(
            ctx.state().get::<Vec<String>>(IMAGE_URL).unwrap(),
            &["http://a/1.jpg", "http://a/2.jpg"]
        );

        let mut ctx = context(Event::private_message(1, vec![Segment::image("no-url.jpg")]));
        assert!(!has_picture.check(&mut ctx).await);
        assert!(!ctx.state().contains(IMAGE_URL));
    }

    #[tokio::test]
    async fn test_must_provide_picture_passes_immediately() {
        let bot = Arc::new(MockBot::new());
        let futures = FutureEvents::new();
        let rule = MustProvidePicture::new(futures.clone());
        let mut ctx = context_with(Event::private_message(1, vec![picture("http://a")]), &bot);

        assert!(rule.check(&mut ctx).await);
        assert!(bot.sent().is_empty());
        assert!(futures.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_must_provide_picture_times_out() {
        let bot = Arc::new(MockBot::new());
        let futures = FutureEvents::new();
        let rule = MustProvidePicture::new(futures.clone());
        let mut ctx = context_with(Event::group_message(5, 1, "upscale"), &bot);

        assert!(!rule.check(&mut ctx).await);
        assert!(!ctx.state().contains(IMAGE_URL));
        assert_eq!(bot.sent().len(), 1);
        assert_eq!(bot.sent()[0].extract_plain_text(), DEFAULT_PROMPT);
        assert!(futures.is_empty());
    }

    #[tokio::test]
    async fn test_must_provide_picture_adopts_follow_up() {
        let bot = Arc::new(MockBot::new());
        let futures = FutureEvents::new();
        let rule = MustProvidePicture::new(futures.clone()).with_prompt("send it");
        let mut ctx = context_with(
            Event::group_message(5, 1, "upscale").with_message_id(100),
            &bot,
        );

        let waiting = tokio::spawn(async move {
            let ok = rule.check(&mut ctx).await;
            (ok, ctx)
        });
        while futures.is_empty() {
            tokio::task::yield_now().await;
        }

        let boxed: rivet_core::BoxedBot = bot.clone();
        // Another user, then the right user without a picture: both ignored.
        let stranger = Event::group_message(5, 2, vec![picture("http://x")]);
        assert!(!futures.deliver(stranger, boxed.clone()).await);
        assert!(!futures.deliver(Event::group_message(5, 1, "wait"), boxed.clone()).await);

        let reply = Event::group_message(5, 1, vec![picture("http://b/1.png")]).with_message_id(101);
        assert!(futures.deliver(reply, boxed).await);

        let (ok, ctx) = waiting.await.unwrap();
        assert!(ok);
        assert_eq!(
            ctx.state().get::<Vec<String>>(IMAGE_URL).unwrap(),
            &["http://b/1.png"]
        );
        assert_eq!(ctx.event().message_id, 101);
        assert_eq!(bot.sent()[0].extract_plain_text(), "send it");
    }
}

use crate::moderation::{
    AWAITING_MODERATION, Cascade, Decision, MemoryNotifier, MemorySubscriberNotifier,
    NotifyOutcome, PLACEHOLDER_PERMALINK, PendingContext, SiteInfo, augment_listing_filter,
    augment_listing_query, compose_pending_notification, content, evaluate, on_approved,
    on_pending_created, permalink, prior_published_count, title,
};
use forumgate_common::error::{Result as StoreResult, StoreError};
use forumgate_common::store::MemoryPostStore;
use forumgate_common::{
    AuthorProfile, ListingQuery, ModerationSettings, NewPost, Post, PostId, PostStatus, PostStore,
    PostType, SettingsFlag, StatusFilter, UserId, Viewer,
};
use url::Url;

fn submission(post_type: PostType, author: UserId) -> NewPost {
    NewPost::new()
        .post_type(post_type)
        .author(author)
        .parent(PostId(1))
        .title("Segfault in release builds")
        .content("Happens only with lto = true.")
        .build()
}

fn stored(post_type: PostType, author: UserId, status: PostStatus) -> Post {
    let mut new = submission(post_type, author);
    new.status = status;
    Post::from_new(PostId(10), new)
}

fn site() -> SiteInfo {
    SiteInfo::new()
        .name("Rust Forum")
        .home(Url::parse("https://forum.example.org/").unwrap())
        .admin_email("admin@example.org")
        .build()
}

fn all_settings() -> Vec<ModerationSettings> {
    (0u8..32)
        .map(|bits| {
            let mut settings = ModerationSettings::default();
            for (i, flag) in SettingsFlag::ALL.into_iter().enumerate() {
                settings.set(flag, bits & (1 << i) != 0);
            }
            settings
        })
        .collect()
}

#[test]
fn test_spam_is_never_overridden() {
    for settings in all_settings() {
        for author in [UserId::ANONYMOUS, UserId(5)] {
            for post_type in PostType::ALL {
                let mut spam = submission(post_type, author);
                spam.status = PostStatus::Spam;
                for prior in [0, 3] {
                    assert_eq!(
                        evaluate(&spam, &Viewer::participant(author), &settings, prior),
                        Decision::KeepAsIs
                    );
                }
            }
        }
    }
}

#[test]
fn test_moderators_are_never_held() {
    let moderator = Viewer::moderator(UserId(1));
    for settings in all_settings() {
        for post_type in PostType::ALL {
            let post = submission(post_type, UserId(1));
            assert_eq!(evaluate(&post, &moderator, &settings, 0), Decision::KeepAsIs);
        }
    }
}

#[test]
fn test_anonymous_topic_follows_topic_flag() {
    let topic = submission(PostType::Topic, UserId::ANONYMOUS);
    let viewer = Viewer::anonymous();

    let hold = ModerationSettings::default().with(SettingsFlag::AlwaysApproveReplies, false);
    assert_eq!(evaluate(&topic, &viewer, &hold, 0), Decision::SetPending);

    let allow = ModerationSettings::default().with(SettingsFlag::AlwaysApproveTopics, false);
    assert_eq!(evaluate(&topic, &viewer, &allow, 0), Decision::KeepAsIs);
}

#[test]
fn test_anonymous_reply_follows_reply_flag() {
    let reply = submission(PostType::Reply, UserId::ANONYMOUS);
    let viewer = Viewer::anonymous();

    let hold = ModerationSettings::default().with(SettingsFlag::AlwaysApproveTopics, false);
    assert_eq!(evaluate(&reply, &viewer, &hold, 0), Decision::SetPending);

    let allow = ModerationSettings::default().with(SettingsFlag::AlwaysApproveReplies, false);
    assert_eq!(evaluate(&reply, &viewer, &allow, 0), Decision::KeepAsIs);
}

#[test]
fn test_anonymous_ignores_prior_count_and_bypass() {
    let reply = submission(PostType::Reply, UserId::ANONYMOUS);
    let settings = ModerationSettings::default()
        .with(SettingsFlag::AlwaysApproveReplies, false)
        .with(SettingsFlag::PreviouslyApproved, false);
    assert_eq!(
        evaluate(&reply, &Viewer::anonymous(), &settings, 0),
        Decision::KeepAsIs
    );
}

#[test]
fn test_registered_author_held_when_bypass_off() {
    let settings = ModerationSettings::default().with(SettingsFlag::PreviouslyApproved, false);
    let author = UserId(8);
    for prior in [0, 1, 250] {
        for post_type in PostType::ALL {
            let post = submission(post_type, author);
            assert_eq!(
                evaluate(&post, &Viewer::participant(author), &settings, prior),
                Decision::SetPending
            );
        }
    }
}

#[test]
fn test_first_time_author_held_once() {
    let settings = ModerationSettings::default();
    let author = UserId(8);
    let post = submission(PostType::Reply, author);
    let viewer = Viewer::participant(author);

    assert_eq!(evaluate(&post, &viewer, &settings, 0), Decision::SetPending);
    assert_eq!(evaluate(&post, &viewer, &settings, 1), Decision::KeepAsIs);
    assert_eq!(evaluate(&post, &viewer, &settings, 40), Decision::KeepAsIs);
}

#[test]
fn test_anonymous_flags_do_not_affect_registered_authors() {
    let settings = ModerationSettings::default()
        .with(SettingsFlag::AlwaysApproveTopics, false)
        .with(SettingsFlag::AlwaysApproveReplies, false);
    let post = submission(PostType::Topic, UserId(8));
    assert_eq!(
        evaluate(&post, &Viewer::participant(UserId(8)), &settings, 0),
        Decision::SetPending
    );
}

#[test]
fn test_prior_count_combines_topics_and_replies() {
    let store = MemoryPostStore::new();
    let author = UserId(4);
    let mut topic = submission(PostType::Topic, author);
    topic.status = PostStatus::Published;
    store.create(topic).unwrap();
    let mut pending_reply = submission(PostType::Reply, author);
    pending_reply.status = PostStatus::Pending;
    store.create(pending_reply).unwrap();

    assert_eq!(prior_published_count(&store, author), 1);
    assert_eq!(prior_published_count(&store, UserId(5)), 0);
    assert_eq!(prior_published_count(&store, UserId::ANONYMOUS), 0);
}

struct BrokenStore;

impl PostStore for BrokenStore {
    fn create(&self, _post: NewPost) -> StoreResult<Post> {
        Err(StoreError::Invalid("offline".into()))
    }
    fn get(&self, _id: PostId) -> StoreResult<Option<Post>> {
        Err(StoreError::Invalid("offline".into()))
    }
    fn set_status(&self, id: PostId, _status: PostStatus) -> StoreResult<Post> {
        Err(StoreError::NotFound(id))
    }
    fn count_by_author_and_status(
        &self,
        _author: UserId,
        _types: &[PostType],
        _status: PostStatus,
    ) -> StoreResult<u64> {
        Err(StoreError::Invalid("offline".into()))
    }
    fn count_by_type_and_status(&self, _t: PostType, _s: PostStatus) -> StoreResult<u64> {
        Err(StoreError::Invalid("offline".into()))
    }
    fn ancestors(&self, _id: PostId) -> StoreResult<Vec<PostId>> {
        Err(StoreError::Invalid("offline".into()))
    }
    fn query(&self, _query: &ListingQuery) -> StoreResult<Vec<Post>> {
        Err(StoreError::Invalid("offline".into()))
    }
}

#[test]
fn test_count_failure_holds_submission() {
    let author = UserId(8);
    let prior = prior_published_count(&BrokenStore, author);
    assert_eq!(prior, 0);
    let post = submission(PostType::Reply, author);
    assert_eq!(
        evaluate(
            &post,
            &Viewer::participant(author),
            &ModerationSettings::default(),
            prior
        ),
        Decision::SetPending
    );
}

#[test]
fn test_augment_admits_pending_and_keeps_base() {
    let settings = ModerationSettings::default();
    let viewer = Viewer::participant(UserId(5));
    let base = StatusFilter::public_for(&viewer);
    let widened = augment_listing_filter(base.clone(), &settings);

    assert!(!base.accepts_status(PostStatus::Pending, UserId(9)));
    assert!(widened.accepts_status(PostStatus::Pending, UserId(9)));

    let statuses = [
        PostStatus::Published,
        PostStatus::Pending,
        PostStatus::Spam,
        PostStatus::Closed,
        PostStatus::Private,
        PostStatus::Hidden,
    ];
    for status in statuses {
        for author in [UserId::ANONYMOUS, UserId(5), UserId(9)] {
            if base.accepts_status(status, author) {
                assert!(widened.accepts_status(status, author), "{status} by {author}");
            }
        }
    }
    assert!(!widened.accepts_status(PostStatus::Spam, UserId(9)));
}

#[test]
fn test_augment_is_noop_when_display_disabled() {
    let settings = ModerationSettings::default().with(SettingsFlag::AlwaysDisplay, false);
    let base = StatusFilter::public();
    assert_eq!(augment_listing_filter(base.clone(), &settings), base);
}

#[test]
fn test_augment_is_idempotent() {
    let settings = ModerationSettings::default();
    let once = augment_listing_filter(StatusFilter::public(), &settings);
    let twice = augment_listing_filter(once.clone(), &settings);
    assert_eq!(once, twice);
}

#[test]
fn test_augment_query_only_touches_statuses() {
    let query = ListingQuery::new()
        .parent(PostId(3))
        .types(vec![PostType::Reply])
        .build();
    let augmented = augment_listing_query(query.clone(), &ModerationSettings::default());
    assert_eq!(augmented.parent, query.parent);
    assert_eq!(augmented.types, query.types);
    assert!(augmented.statuses.includes(PostStatus::Pending));
}

#[test]
fn test_on_approved_cascades_with_full_ancestry() {
    let subscribers = MemorySubscriberNotifier::new();
    let reply = stored(PostType::Reply, UserId(2), PostStatus::Published);

    let cascade = on_approved(&reply, &[PostId(4), PostId(1)], &subscribers);
    let expected = Cascade {
        reply: PostId(10),
        topic: PostId(4),
        forum: PostId(1),
    };
    assert_eq!(cascade, Some(expected));
    assert_eq!(subscribers.cascades(), vec![expected]);
}

#[test]
fn test_on_approved_uses_last_ancestor_as_forum() {
    let subscribers = MemorySubscriberNotifier::new();
    let reply = stored(PostType::Reply, UserId(2), PostStatus::Published);

    let cascade = on_approved(&reply, &[PostId(4), PostId(3), PostId(1)], &subscribers).unwrap();
    assert_eq!(cascade.topic, PostId(4));
    assert_eq!(cascade.forum, PostId(1));
}

#[test]
fn test_on_approved_skips_incomplete_ancestry() {
    let subscribers = MemorySubscriberNotifier::new();
    let reply = stored(PostType::Reply, UserId(2), PostStatus::Published);

    assert_eq!(on_approved(&reply, &[PostId(4)], &subscribers), None);
    assert_eq!(on_approved(&reply, &[], &subscribers), None);
    assert!(subscribers.cascades().is_empty());
}

#[test]
fn test_on_approved_ignores_topics() {
    let subscribers = MemorySubscriberNotifier::new();
    let topic = stored(PostType::Topic, UserId(2), PostStatus::Published);
    assert_eq!(
        on_approved(&topic, &[PostId(4), PostId(1)], &subscribers),
        None
    );
    assert!(subscribers.cascades().is_empty());
}

#[test]
fn test_anonymous_reply_scenario() {
    // Anonymous reply, replies always held, viewer cannot moderate.
    let settings = ModerationSettings::default();
    let mut reply = submission(PostType::Reply, UserId::ANONYMOUS);
    let decision = evaluate(&reply, &Viewer::anonymous(), &settings, 0);
    assert_eq!(decision, Decision::SetPending);

    decision.apply(&mut reply);
    let post = Post::from_new(PostId(11), reply);
    let notifier = MemoryNotifier::new();
    let site = site();
    let outcome = on_pending_created(
        &post,
        &settings,
        PendingContext {
            site: &site,
            author: None,
        },
        &notifier,
    );

    assert_eq!(outcome, NotifyOutcome::Sent);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Happens only with lto = true."));
    assert!(sent[0].body.contains("Anonymous"));
    assert_eq!(sent[0].to, "admin@example.org");
}

#[test]
fn test_notification_layout() {
    let post = stored(PostType::Topic, UserId(3), PostStatus::Pending);
    let profile = AuthorProfile::new("mira").with_name("Mira", "Okafor");
    let n = compose_pending_notification(&site(), &post, Some(&profile));

    assert_eq!(n.subject, "[Rust Forum] Forum moderation - Segfault in release builds");
    assert_eq!(
        n.body,
        "New topic/reply awaiting moderation on your site Rust Forum: https://forum.example.org/\r\n\r\n\
         https://forum.example.org/?p=10\r\n\r\n\
         The following content was posted\r\n\
         by mira (Mira Okafor)\r\n\r\n\
         Segfault in release builds\r\nHappens only with lto = true.\r\n\r\n"
    );
}

#[test]
fn test_notification_omits_name_equal_to_login() {
    let post = stored(PostType::Reply, UserId(3), PostStatus::Pending);
    let profile = AuthorProfile::new("mira").with_display_name("mira");
    let n = compose_pending_notification(&site(), &post, Some(&profile));
    assert!(n.body.contains("by mira\r\n"));
    assert!(!n.body.contains("Anonymous"));
}

#[test]
fn test_notification_for_unknown_author_is_anonymous() {
    let post = stored(PostType::Reply, UserId(3), PostStatus::Pending);
    let n = compose_pending_notification(&site(), &post, None);
    assert!(n.body.contains("by Anonymous\r\n"));
}

#[test]
fn test_pending_created_respects_flag_and_status() {
    let notifier = MemoryNotifier::new();
    let site = site();
    let ctx = PendingContext {
        site: &site,
        author: None,
    };

    let published = stored(PostType::Reply, UserId(3), PostStatus::Published);
    assert_eq!(
        on_pending_created(&published, &ModerationSettings::default(), ctx, &notifier),
        NotifyOutcome::NotPending
    );

    let pending = stored(PostType::Reply, UserId(3), PostStatus::Pending);
    let quiet = ModerationSettings::default().with(SettingsFlag::Notify, false);
    assert_eq!(
        on_pending_created(&pending, &quiet, ctx, &notifier),
        NotifyOutcome::Disabled
    );
    assert!(notifier.sent().is_empty());
}

#[test]
fn test_delivery_failure_is_swallowed() {
    let notifier = MemoryNotifier::new();
    notifier.fail_with("smtp unreachable");
    let site = site();
    let pending = stored(PostType::Topic, UserId::ANONYMOUS, PostStatus::Pending);

    let outcome = on_pending_created(
        &pending,
        &ModerationSettings::default(),
        PendingContext {
            site: &site,
            author: None,
        },
        &notifier,
    );
    assert!(matches!(outcome, NotifyOutcome::Failed(ref msg) if msg.contains("smtp unreachable")));
    assert!(notifier.sent().is_empty());

    notifier.recover();
    let outcome = on_pending_created(
        &pending,
        &ModerationSettings::default(),
        PendingContext {
            site: &site,
            author: None,
        },
        &notifier,
    );
    assert!(outcome.is_sent());
}

#[test]
fn test_display_transforms_for_pending() {
    let pending = stored(PostType::Reply, UserId(3), PostStatus::Pending);
    let visitor = Viewer::participant(UserId(7));
    let moderator = Viewer::moderator(UserId(1));
    let link = "https://forum.example.org/?p=10";

    assert_eq!(permalink(&pending, link, &visitor), PLACEHOLDER_PERMALINK);
    assert_eq!(permalink(&pending, link, &moderator), link);

    assert_eq!(
        title(&pending, "Segfault"),
        format!("Segfault {AWAITING_MODERATION}")
    );

    assert_eq!(content(&pending, "body", &visitor), AWAITING_MODERATION);
    assert_eq!(
        content(&pending, "body", &moderator),
        "(Awaiting moderation)<br />body"
    );
}

#[test]
fn test_display_transforms_leave_published_alone() {
    let published = stored(PostType::Topic, UserId(3), PostStatus::Published);
    let visitor = Viewer::anonymous();
    assert_eq!(permalink(&published, "/t/10", &visitor), "/t/10");
    assert_eq!(title(&published, "Segfault"), "Segfault");
    assert_eq!(content(&published, "body", &visitor), "body");
}

use super::Decision;
use forumgate_common::{ModerationSettings, NewPost, PostStatus, PostStore, PostType, UserId, Viewer};

/// Decide whether a submission is held for moderation
///
/// Runs before the submission is stored. Rules are checked in order and the
/// first one that applies wins:
///
/// 1. A submission already marked [`PostStatus::Spam`] is left alone.
/// 2. Submissions by a viewer holding the moderate capability are never held.
/// 3. Anonymous topics are held when `always_approve_topics` is set, anonymous
///    replies when `always_approve_replies` is set.
/// 4. Registered authors are always held when `previously_approved_bypass` is
///    off; with it on, they are held until they have a published post.
///
/// # Arguments
///
/// * `candidate` - The submission about to be stored
/// * `viewer` - The acting user
/// * `settings` - Settings snapshot for this request
/// * `prior_published` - Published topics and replies by the author, only
///   consulted for registered authors (see [`prior_published_count`])
pub fn evaluate(
    candidate: &NewPost,
    viewer: &Viewer,
    settings: &ModerationSettings,
    prior_published: u64,
) -> Decision {
    let decision = if candidate.status == PostStatus::Spam || viewer.can_moderate() {
        Decision::KeepAsIs
    } else if candidate.author.is_anonymous() {
        let hold = match candidate.post_type {
            PostType::Topic => settings.always_approve_topics,
            PostType::Reply => settings.always_approve_replies,
        };
        if hold {
            Decision::SetPending
        } else {
            Decision::KeepAsIs
        }
    } else if !settings.previously_approved_bypass || prior_published == 0 {
        Decision::SetPending
    } else {
        Decision::KeepAsIs
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        author = %candidate.author,
        post_type = %candidate.post_type,
        status = %candidate.status,
        prior_published,
        ?decision,
        "evaluated submission"
    );

    decision
}

/// Number of published topics and replies by `author`, failing safe
///
/// Topics and replies are counted together, so an author with a published
/// topic is not held for their first reply. A store error counts as zero,
/// which holds the submission rather than publishing it unchecked.
pub fn prior_published_count(store: &impl PostStore, author: UserId) -> u64 {
    if author.is_anonymous() {
        return 0;
    }
    match store.count_by_author_and_status(author, &PostType::ALL, PostStatus::Published) {
        Ok(count) => count,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                %author,
                error = %_e,
                "could not count published posts, holding submission"
            );
            0
        }
    }
}

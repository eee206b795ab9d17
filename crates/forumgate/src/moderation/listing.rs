use forumgate_common::{ListingQuery, ModerationSettings, PostStatus, StatusClause, StatusFilter};

/// Widen a listing filter so pending posts are shown
///
/// When `always_display_pending` is set, every pending post is admitted in
/// addition to whatever `base` already admits. Otherwise `base` is returned
/// unchanged. The result always accepts a superset of what `base` accepts.
///
/// # Example
///
/// ```
/// # use forumgate::moderation::augment_listing_filter;
/// # use forumgate_common::{ModerationSettings, PostStatus, StatusFilter, UserId};
/// let filter = augment_listing_filter(StatusFilter::public(), &ModerationSettings::default());
/// assert!(filter.accepts_status(PostStatus::Pending, UserId(3)));
/// assert!(filter.accepts_status(PostStatus::Published, UserId(3)));
/// ```
pub fn augment_listing_filter(
    mut base: StatusFilter,
    settings: &ModerationSettings,
) -> StatusFilter {
    if settings.always_display_pending {
        base.insert(StatusClause::any(PostStatus::Pending));
    }
    base
}

/// Apply [`augment_listing_filter`] to the status filter of a query
pub fn augment_listing_query(
    mut query: ListingQuery,
    settings: &ModerationSettings,
) -> ListingQuery {
    query.statuses = augment_listing_filter(query.statuses, settings);
    query
}

//! Orders [`Post`]s for the home page and converts them into
//! [`PostSummary`]s.

use crate::date::Timestamp;
use crate::post::{Post, PostSummary};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// Returns a summary for each post, most recent first.
///
/// Posts are sorted by their parsed dates in descending order. The sort is
/// stable, so posts with identical timestamps keep the order in which they
/// were passed in. Posts whose date is missing or unparseable come after
/// every dated post, also in the order they were passed in.
pub fn list_posts(posts: &[Post]) -> Vec<PostSummary> {
    let mut keyed: Vec<(Option<DateTime<FixedOffset>>, &Post)> = posts
        .iter()
        .map(|post| (sort_key(post), post))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| newest_first(a.as_ref(), b.as_ref()));
    keyed.into_iter().map(|(_, post)| summarize(post)).collect()
}

/// Converts a single [`Post`] into a [`PostSummary`]. The summary has a
/// formatted date iff the post has a date, and a description iff the post
/// has one.
pub fn summarize(post: &Post) -> PostSummary {
    PostSummary {
        slug: post.slug.clone(),
        title: post.title.clone(),
        formatted_date: post
            .date
            .as_deref()
            .map(|date| Timestamp::parse(date).to_string()),
        description: post.description.clone(),
    }
}

fn sort_key(post: &Post) -> Option<DateTime<FixedOffset>> {
    post.date
        .as_deref()
        .map(Timestamp::parse)
        .and_then(|ts| ts.datetime().copied())
}

fn newest_first(
    a: Option<&DateTime<FixedOffset>>,
    b: Option<&DateTime<FixedOffset>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::date::INVALID_DATE;

    fn post(id: &str, date: Option<&str>) -> Post {
        Post {
            id: id.to_owned(),
            slug: format!("/posts/{}", id),
            title: id.to_uppercase(),
            date: date.map(str::to_owned),
            description: None,
            body: String::new(),
        }
    }

    fn slugs(summaries: &[PostSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.slug.as_str()).collect()
    }

    #[test]
    fn test_list_posts_newest_first() {
        let posts = vec![
            post("a", Some("2021-06-01")),
            post("b", Some("2024-01-05")),
            post("c", Some("2022-11-30T12:00:00Z")),
        ];
        assert_eq!(
            vec!["/posts/b", "/posts/c", "/posts/a"],
            slugs(&list_posts(&posts))
        );
    }

    #[test]
    fn test_list_posts_compares_instants_across_offsets() {
        // 01:00 at +02:00 is 23:00 UTC the previous day.
        let posts = vec![
            post("early", Some("2024-01-05T01:00:00+02:00")),
            post("late", Some("2024-01-04T23:30:00Z")),
        ];
        assert_eq!(
            vec!["/posts/late", "/posts/early"],
            slugs(&list_posts(&posts))
        );
    }

    #[test]
    fn test_list_posts_ties_keep_input_order() {
        let posts = vec![
            post("x", Some("2024-01-05")),
            post("y", Some("2024-01-05T00:00:00Z")),
            post("z", Some("2024-01-05")),
        ];
        assert_eq!(
            vec!["/posts/x", "/posts/y", "/posts/z"],
            slugs(&list_posts(&posts))
        );
    }

    #[test]
    fn test_list_posts_undated_last() {
        let posts = vec![
            post("undated", None),
            post("garbage", Some("not a date")),
            post("old", Some("2019-01-01")),
            post("new", Some("2020-01-01")),
        ];
        let summaries = list_posts(&posts);
        assert_eq!(
            vec!["/posts/new", "/posts/old", "/posts/undated", "/posts/garbage"],
            slugs(&summaries)
        );
        assert_eq!(None, summaries[2].formatted_date);
        assert_eq!(Some(INVALID_DATE.to_owned()), summaries[3].formatted_date);
    }

    #[test]
    fn test_summarize_fields() {
        let mut p = post("hello", Some("2024-01-05"));
        p.description = Some("A greeting".to_owned());
        assert_eq!(
            PostSummary {
                slug: "/posts/hello".to_owned(),
                title: "HELLO".to_owned(),
                formatted_date: Some("1/5/2024".to_owned()),
                description: Some("A greeting".to_owned()),
            },
            summarize(&p)
        );

        let bare = summarize(&post("bare", None));
        assert_eq!(None, bare.formatted_date);
        assert_eq!(None, bare.description);
    }

    #[test]
    fn test_list_posts_is_idempotent() {
        let posts = vec![
            post("a", Some("2021-06-01")),
            post("b", None),
            post("c", Some("2023-02-02")),
        ];
        assert_eq!(list_posts(&posts), list_posts(&posts));
    }

    #[test]
    fn test_list_posts_empty() {
        assert!(list_posts(&[]).is_empty());
    }
}

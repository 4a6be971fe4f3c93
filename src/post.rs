//! Defines the [`Post`] and [`PostSummary`] types and their conversions into
//! template [`Value`]s.

use gtmpl::Value;
use std::collections::HashMap;

/// Represents a single blog entry. Posts are created by the
/// [`crate::parser::Parser`] and are only read thereafter.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// A stable, unique identifier. For posts parsed from disk this is the
    /// source path relative to the content directory (e.g. `posts/foo.md`).
    pub id: String,

    /// The site-relative URL path for the post (e.g. `/posts/foo`). Slugs are
    /// unique across posts.
    pub slug: String,

    /// The title of the post.
    pub title: String,

    /// The date of the post as written in the source. It isn't validated
    /// here; see [`crate::date::Timestamp::parse`].
    pub date: Option<String>,

    /// A short description shown in listings.
    pub description: Option<String>,

    /// The rendered HTML body.
    pub body: String,
}

impl Post {
    /// Converts a [`Post`] into a template [`Value::Object`] with fields
    /// `id`, `slug`, `title`, `date`, `description`, and `body`. Absent
    /// optional fields become [`Value::Nil`].
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("id".to_owned(), Value::String(self.id.clone()));
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), optional(&self.date));
        m.insert("description".to_owned(), optional(&self.description));
        m.insert("body".to_owned(), Value::String(self.body.clone()));
        Value::Object(m)
    }
}

/// The listing record for a [`Post`]. See [`crate::listing::list_posts`].
#[derive(Clone, Debug, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,

    /// The display form of the post's date. Present iff the post has a date.
    pub formatted_date: Option<String>,

    /// Present iff the post has a description.
    pub description: Option<String>,
}

impl From<&PostSummary> for Value {
    /// Converts [`PostSummary`]s into [`Value`]s for templating.
    fn from(s: &PostSummary) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("slug".to_owned(), Value::String(s.slug.clone()));
        m.insert("title".to_owned(), Value::String(s.title.clone()));
        m.insert("formatted_date".to_owned(), optional(&s.formatted_date));
        m.insert("description".to_owned(), optional(&s.description));
        Value::Object(m)
    }
}

fn optional(field: &Option<String>) -> Value {
    match field {
        Some(s) => Value::String(s.clone()),
        None => Value::Nil,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn field<'a>(value: &'a Value, name: &str) -> &'a Value {
        match value {
            Value::Object(m) => &m[name],
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_post_to_value_absent_fields_are_nil() {
        let post = Post {
            id: "posts/hello.md".to_owned(),
            slug: "/posts/hello".to_owned(),
            title: "Hello".to_owned(),
            date: None,
            description: Some("Greetings".to_owned()),
            body: "<p>hi</p>".to_owned(),
        };
        let value = post.to_value();
        assert!(matches!(field(&value, "date"), Value::Nil));
        assert!(matches!(
            field(&value, "description"),
            Value::String(s) if s == "Greetings"
        ));
        assert!(matches!(
            field(&value, "slug"),
            Value::String(s) if s == "/posts/hello"
        ));
    }

    #[test]
    fn test_summary_to_value() {
        let summary = PostSummary {
            slug: "/posts/hello".to_owned(),
            title: "Hello".to_owned(),
            formatted_date: Some("1/5/2024".to_owned()),
            description: None,
        };
        let value = Value::from(&summary);
        assert!(matches!(
            field(&value, "formatted_date"),
            Value::String(s) if s == "1/5/2024"
        ));
        assert!(matches!(field(&value, "description"), Value::Nil));
    }
}

// Resource operations layered on the gateway. Each one checks what it can
// locally, then builds the exact path/method/body the backend expects.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod driver;
pub mod payments;
pub mod ratings;
pub mod rides;
pub mod users;

use url::form_urlencoded;

// Appends an encoded query string to `path`.
pub(crate) fn with_query<'a, I>(path: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        query.append_pair(name, &value);
    }
    let query = query.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

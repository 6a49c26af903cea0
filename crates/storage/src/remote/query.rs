use url::Url;

/// PostgREST query string: column filters, ordering, and paging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestQuery {
    params: Vec<(String, String)>,
}

impl RestQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    /// `column=eq.value`
    #[must_use]
    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    /// Descending order; `nulls_last` pushes NULL values to the end.
    #[must_use]
    pub fn order_desc(self, column: &str, nulls_last: bool) -> Self {
        let suffix = if nulls_last { ".nullslast" } else { "" };
        self.param("order", format!("{column}.desc{suffix}"))
    }

    #[must_use]
    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit.to_string())
    }

    #[must_use]
    pub fn on_conflict(self, columns: &str) -> Self {
        self.param("on_conflict", columns)
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &self.params {
            pairs.append_pair(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn builds_filters_in_order() {
        let query = RestQuery::new()
            .select("*")
            .eq("type", "movie")
            .order_desc("rating", true)
            .limit(5);

        let mut url = Url::parse("https://h.example/rest/v1/content").unwrap();
        query.apply(&mut url);

        assert_eq!(
            pairs(&url),
            vec![
                ("select".to_owned(), "*".to_owned()),
                ("type".to_owned(), "eq.movie".to_owned()),
                ("order".to_owned(), "rating.desc.nullslast".to_owned()),
                ("limit".to_owned(), "5".to_owned()),
            ]
        );
    }

    #[test]
    fn empty_query_leaves_url_untouched() {
        let mut url = Url::parse("https://h.example/rest/v1/users").unwrap();
        RestQuery::new().apply(&mut url);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn on_conflict_lists_columns() {
        let query = RestQuery::new().on_conflict("user_id,content_id");
        assert_eq!(
            query.params(),
            &[("on_conflict".to_owned(), "user_id,content_id".to_owned())]
        );
    }
}

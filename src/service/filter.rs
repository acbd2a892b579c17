//! Composable WHERE-clause builder for the search endpoints.
//!
//! A [`Predicate`] is a conjunction of clauses. Clauses for a criterion that
//! was not supplied are never emitted, so an empty predicate matches every
//! row. Predicates for joined tables are built separately (scoped to the
//! table alias) and merged with [`Predicate::and`].

use sqlx::{QueryBuilder, Sqlite};

/// A bound SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Text(String),
    Integer(i64),
}

impl From<String> for Bound {
    fn from(v: String) -> Self {
        Bound::Text(v)
    }
}

impl From<&str> for Bound {
    fn from(v: &str) -> Self {
        Bound::Text(v.to_string())
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Integer(v)
    }
}

impl From<u32> for Bound {
    fn from(v: u32) -> Self {
        Bound::Integer(i64::from(v))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// `column LIKE '%needle%'`, ASCII case-insensitive in SQLite.
    Contains { column: String, pattern: String },
    Equals { column: String, value: Bound },
    AnyOf { column: String, values: Vec<i64> },
    /// Disjunction of nested predicates.
    Either(Vec<Predicate>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    scope: Option<&'static str>,
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Predicate whose column names are used verbatim (expressions allowed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicate whose column names are qualified with a table alias.
    pub fn scoped(alias: &'static str) -> Self {
        Self {
            scope: Some(alias),
            clauses: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn qualify(&self, column: &str) -> String {
        match self.scope {
            Some(alias) => format!("{alias}.{column}"),
            None => column.to_string(),
        }
    }

    /// Case-insensitive substring match, skipped when `needle` is absent or blank.
    pub fn contains(mut self, column: &str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.filter(|n| !n.trim().is_empty()) {
            self.clauses.push(Clause::Contains {
                column: self.qualify(column),
                pattern: like_pattern(needle),
            });
        }
        self
    }

    /// Exact match, skipped when `value` is absent.
    pub fn equals<V: Into<Bound>>(mut self, column: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.clauses.push(Clause::Equals {
                column: self.qualify(column),
                value: value.into(),
            });
        }
        self
    }

    /// `column IN (...)`. Unlike the other clauses this is always emitted:
    /// an empty id set matches nothing.
    pub fn any_of(mut self, column: &str, values: Vec<i64>) -> Self {
        self.clauses.push(Clause::AnyOf {
            column: self.qualify(column),
            values,
        });
        self
    }

    /// Match rows satisfying at least one of `alternatives`.
    pub fn either(mut self, alternatives: Vec<Predicate>) -> Self {
        self.clauses.push(Clause::Either(alternatives));
        self
    }

    /// Conjunction with a predicate built for another table.
    pub fn and(mut self, other: Predicate) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    /// Append ` WHERE <predicate>` to `qb`.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE ");
        self.push_expr(qb);
    }

    fn push_expr(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if self.clauses.is_empty() {
            qb.push("1 = 1");
            return;
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            match clause {
                Clause::Contains { column, pattern } => {
                    qb.push(column.as_str())
                        .push(" LIKE ")
                        .push_bind(pattern.clone())
                        .push(" ESCAPE '\\'");
                }
                Clause::Equals { column, value } => {
                    qb.push(column.as_str()).push(" = ");
                    match value {
                        Bound::Text(v) => qb.push_bind(v.clone()),
                        Bound::Integer(v) => qb.push_bind(*v),
                    };
                }
                Clause::AnyOf { values, .. } if values.is_empty() => {
                    qb.push("1 = 0");
                }
                Clause::AnyOf { column, values } => {
                    qb.push(column.as_str()).push(" IN (");
                    let mut list = qb.separated(", ");
                    for v in values {
                        list.push_bind(*v);
                    }
                    list.push_unseparated(")");
                }
                Clause::Either(alternatives) if alternatives.is_empty() => {
                    qb.push("1 = 0");
                }
                Clause::Either(alternatives) => {
                    qb.push("(");
                    for (j, alt) in alternatives.iter().enumerate() {
                        if j > 0 {
                            qb.push(" OR ");
                        }
                        qb.push("(");
                        alt.push_expr(qb);
                        qb.push(")");
                    }
                    qb.push(")");
                }
            }
        }
    }
}

/// Wrap `needle` as `%needle%`, escaping LIKE metacharacters with `\`.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    fn render(p: &Predicate) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT name FROM people p");
        p.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn absent_criteria_emit_no_clauses() {
        let p = Predicate::scoped("p")
            .contains("name", None)
            .contains("name", Some(""))
            .contains("name", Some("   "))
            .equals::<String>("class", None);
        assert!(p.is_empty());
        assert_eq!(render(&p), "SELECT name FROM people p WHERE 1 = 1");
    }

    #[test]
    fn scoped_predicates_merge_across_hops() {
        let p = Predicate::scoped("s")
            .equals("class", Some("10"))
            .and(Predicate::scoped("u").contains("name", Some("jo")));
        assert_eq!(
            render(&p),
            "SELECT name FROM people p WHERE s.class = ? AND u.name LIKE ? ESCAPE '\\'"
        );
    }

    #[test]
    fn either_and_any_of_render_grouped() {
        let p = Predicate::new().either(vec![
            Predicate::scoped("ct").any_of("cr1", vec![1, 2]),
            Predicate::scoped("ct").any_of("cr2", vec![]),
        ]);
        assert_eq!(
            render(&p),
            "SELECT name FROM people p WHERE ((ct.cr1 IN (?, ?)) OR (1 = 0))"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("jo"), "%jo%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    async fn people() -> sqlx::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE people (name TEXT NOT NULL, class TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        for (name, class) in [("John", "10"), ("Major", "9"), ("Ann", "10"), ("50%", "9")] {
            sqlx::query("INSERT INTO people (name, class) VALUES (?, ?)")
                .bind(name)
                .bind(class)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool
    }

    async fn names(pool: &sqlx::SqlitePool, p: Predicate) -> Vec<String> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT name FROM people p");
        p.push_where(&mut qb);
        qb.push(" ORDER BY name");
        qb.build_query_scalar::<String>()
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn substring_match_is_unanchored_and_case_insensitive() {
        let pool = people().await;
        let hits = names(&pool, Predicate::scoped("p").contains("name", Some("JO"))).await;
        assert_eq!(hits, vec!["John", "Major"]);
    }

    #[tokio::test]
    async fn empty_predicate_returns_every_row() {
        let pool = people().await;
        assert_eq!(names(&pool, Predicate::new()).await.len(), 4);
    }

    #[tokio::test]
    async fn percent_in_needle_is_literal() {
        let pool = people().await;
        let hits = names(&pool, Predicate::scoped("p").contains("name", Some("%"))).await;
        assert_eq!(hits, vec!["50%"]);
    }

    #[tokio::test]
    async fn case_folding_covers_ascii_letters_only() {
        let pool = people().await;
        sqlx::query("INSERT INTO people (name, class) VALUES ('Émile', '9')")
            .execute(&pool)
            .await
            .unwrap();
        let find = |needle: &'static str| {
            let pool = pool.clone();
            async move { names(&pool, Predicate::scoped("p").contains("name", Some(needle))).await }
        };
        assert_eq!(find("Émile").await, vec!["Émile"]);
        assert_eq!(find("MILE").await, vec!["Émile"]);
        assert!(find("émile").await.is_empty());
    }

    #[tokio::test]
    async fn equality_is_exact() {
        let pool = people().await;
        let hits = names(&pool, Predicate::scoped("p").equals("class", Some("1"))).await;
        assert!(hits.is_empty());
        let hits = names(&pool, Predicate::scoped("p").equals("class", Some("10"))).await;
        assert_eq!(hits, vec!["Ann", "John"]);
    }
}

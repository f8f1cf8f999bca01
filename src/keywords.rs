//! Closed keyword table shared by the tokenizer (to classify `Keyword`
//! lexemes) and the parser (to enforce the Identifier rules allow-list,
//! §4.2).
//!
//! Grounded on the keyword-table idiom used throughout the corpus's SQL
//! front ends, e.g. `other_examples/23ca3007_sqlparser-rs-sqlparser-rs__
//! src-dialect-keywords.rs`: a macro defines one string constant per
//! keyword and an `ALL_KEYWORDS` array built from the same list, so the
//! keyword table and its lookup set can never drift apart.

macro_rules! kw_def {
    ($ident:ident) => {
        pub const $ident: &str = stringify!($ident);
    };
}

macro_rules! define_keywords {
    ($($ident:ident),*$(,)?) => {
        $(kw_def!($ident);)*
        pub const ALL_KEYWORDS: &[&str] = &[$($ident),*];
    };
}

define_keywords!(
    ADD, ALL, ALTER, ANALYZE, AND, ANY, AS, ASC, AUTHORIZATION, BETWEEN, BY, CACHE, CASCADE,
    CASE, CAST, COLUMN, COMMENT, CONCURRENTLY, CONFLICT, CONSTRAINT, CREATE, CROSS, DEFAULT,
    DELETE, DESC, DISTINCT, DO, DROP, ELSE, END, ESCAPE, EXCEPT, EXISTS, EXTRACT, FALSE, FETCH,
    FILTER, FIRST, FOR, FROM, FULL, GROUP, GROUPS, HAVING, ILIKE, IN, INCLUDE, INCREMENT,
    INDEX, INNER, INSERT, INTERSECT, INTO, IS, JOIN, KEY, LAST, LATERAL, LEFT, LIKE, LIMIT,
    MATCHED, MATERIALIZED, MAXVALUE, MERGE, MINVALUE, NATURAL, NEXT, NO, NOT, NOTHING, NOWAIT,
    NULL, NULLS, OF, OFFSET, ON, ONLY, OR, ORDER, OUTER, OVER, OVERLAPS, OWNED, PARTITION,
    RANGE, RECURSIVE, RENAME, REPLACE, RESTART, RESTRICT, RETURNING, RIGHT, ROW, ROWS, SCHEMA,
    SELECT, SEQUENCE, SET, SHARE, SKIP, SOURCE, START, TABLE, TABLESPACE, TARGET, TEMPORARY,
    THEN, TIES, TO, TRUE, UNION, UNIQUE, UNKNOWN, UPDATE, USING, VALUES, VERBOSE, WAIT, WHEN,
    WHERE, WINDOW, WITH, WITHIN, WITHOUT,
);

/// Non-reserved keywords that the parser allows to double as plain
/// identifiers (§4.2 "Identifier rules").
pub const NON_RESERVED_FOR_IDENTIFIER: &[&str] = &[
    GROUPS, ROWS, RANGE, PARTITION, KEY, SOURCE, TARGET, FIRST, LAST, NEXT, SHARE, TIES, WAIT,
    SKIP, NOWAIT, VERBOSE, RESTART, CACHE, SEQUENCE, SCHEMA, MATERIALIZED, INCREMENT, MAXVALUE,
    MINVALUE, OWNED, ONLY, NO, OF, TABLESPACE, CONCURRENTLY, MATCHED, NOTHING,
];

/// True if `word` (already uppercased) is in the closed keyword set.
pub fn is_keyword(word: &str) -> bool {
    ALL_KEYWORDS.contains(&word)
}

/// True if `word` is a keyword that may still be used as a bare
/// identifier per the allow-list.
pub fn is_non_reserved(word: &str) -> bool {
    NON_RESERVED_FOR_IDENTIFIER.contains(&word)
}

/// True if `word` is a keyword that can never be used as an identifier.
pub fn is_reserved(word: &str) -> bool {
    is_keyword(word) && !is_non_reserved(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_reserved() {
        assert!(is_reserved("SELECT"));
    }

    #[test]
    fn rows_is_non_reserved() {
        assert!(is_keyword("ROWS"));
        assert!(!is_reserved("ROWS"));
    }

    #[test]
    fn plain_word_is_not_a_keyword() {
        assert!(!is_keyword("ARTICLES"));
    }
}

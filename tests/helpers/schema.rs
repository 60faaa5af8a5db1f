//! Declared tables shared across the integration suites.
use snapmig::catalog::Table;

pub fn users() -> Table {
    let mut table = Table::new("users");
    table
        .generate(
            "id: id
             email* U: string(128)
             name: string",
        )
        .expect("valid users description");
    table
}

pub fn posts() -> Table {
    let mut table = Table::new("posts");
    table
        .generate(
            "id: id
             user_id* -> users(cascade): uint
             title*: string(200)
             body: text",
        )
        .expect("valid posts description");
    table
}

pub fn comments() -> Table {
    let mut table = Table::new("comments");
    table
        .generate(
            "id: id
             post_id* -> posts: uint
             body: text",
        )
        .expect("valid comments description");
    table
}

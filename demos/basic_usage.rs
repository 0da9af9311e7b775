// Example: Basic querykit usage
// Run with: cargo run --example basic_usage

use querykit::{ParameterMap, QueryStore};

fn main() -> anyhow::Result<()> {
    println!("=== querykit Basic Usage Example ===\n");

    let mut store = QueryStore::new();

    // 1. Load the embedded query file
    println!("1. Loading users.sql...");
    store.embed("users.sql", include_str!("users.sql"));
    let count = store.load("users.sql")?;
    println!("Loaded {} queries\n", count);

    // 2. Plain lookup
    println!("2. Query 'all_users':");
    println!("{}\n", store.get("all_users")?);

    // 3. Bind parameters
    println!("3. Query 'adults' with parameters:");
    let mut params = ParameterMap::new();
    params.insert("min_age".to_string(), 18.into());
    params.insert("status".to_string(), "active".into());
    println!("{}\n", store.query("adults", &params)?);

    // 4. Literal SQL goes through the same path
    println!("4. Literal SQL with a quoted value:");
    let mut params = ParameterMap::new();
    params.insert("name".to_string(), "O'Connor".into());
    println!("{}\n", store.query("SELECT * FROM admins WHERE name = :name", &params)?);

    // 5. Rewrite the columns of a named query
    println!("5. 'all_users' with only id and email:");
    println!("{}\n", store.select_columns("all_users", &["id", "email"])?);

    // 6. Rewrite the WHERE clause
    println!("6. 'user_by_name' filtered by id instead:");
    let mut conditions = ParameterMap::new();
    conditions.insert("id".to_string(), 42.into());
    println!("{}\n", store.where_conditions("user_by_name", &conditions)?);

    println!("=== Example Complete ===");
    Ok(())
}

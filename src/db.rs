//! Database schema setup for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{CategoryName, count_categories, create_category, create_category_table},
    expense::create_expense_table,
};

/// The categories created for a new database.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Food", "Transport", "Shopping", "Bills", "Other"];

/// Create the application tables and seed the default categories.
///
/// Tables are only created if they do not exist and the default categories
/// are only added if there are no categories, so this function is safe to
/// call every time the application starts.
///
/// Foreign keys are enforced on `connection` so that expenses cannot refer to
/// missing categories.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // This pragma is a no-op inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    if count_categories(connection)? > 0 {
        return Ok(());
    }

    tracing::info!("Seeding {} default categories", DEFAULT_CATEGORIES.len());

    for name in DEFAULT_CATEGORIES {
        create_category(CategoryName::new_unchecked(name), connection)?;
    }

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use crate::{
        category::{CategoryName, create_category, delete_category, get_all_categories},
        db::{DEFAULT_CATEGORIES, initialize},
    };

    fn get_category_names(connection: &Connection) -> Vec<String> {
        let mut names = get_all_categories(connection)
            .expect("Could not get categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn seeds_default_categories() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let mut want = DEFAULT_CATEGORIES.map(str::to_owned).to_vec();
        want.sort();
        assert_eq!(get_category_names(&connection), want);
    }

    #[test]
    fn can_initialize_twice_without_duplicating_categories() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");

        assert_eq!(
            get_category_names(&connection).len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[test]
    fn does_not_reseed_when_user_categories_exist() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        for category in get_all_categories(&connection).unwrap() {
            delete_category(category.id, &connection).expect("Could not delete category");
        }
        create_category(CategoryName::new_unchecked("Rent"), &connection).unwrap();

        initialize(&connection).expect("Could not initialize database a second time");

        assert_eq!(get_category_names(&connection), vec!["Rent".to_owned()]);
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let foreign_keys: bool = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(foreign_keys);
    }
}

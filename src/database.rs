//! # SQLite
//!
//! Row storage for the two tables, `products` and `orders`.
//!
//! Every request opens its own connection and drops it when done; there is no
//! pool and no cross-request transaction. Schema setup runs once at startup
//! and is additive only: tables are created if absent and late columns are
//! added through [`ensure_column`], so restarting against an old database
//! file never loses data.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
}

/// `payment_method` and `status` arrived as additive migrations, so rows
/// written before those columns existed read back as NULL.
#[derive(Debug, Serialize)]
pub struct Order {
    pub id: i64,
    pub product: String,
    pub price: String,
    pub name: String,
    pub phone: String,
    pub payment_image: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CashOnDelivery,
    MobileWalletTransfer,
    BankTransferAlt,
}

impl PaymentMethod {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "CashOnDelivery" => Some(Self::CashOnDelivery),
            "MobileWalletTransfer" => Some(Self::MobileWalletTransfer),
            "BankTransferAlt" => Some(Self::BankTransferAlt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "CashOnDelivery",
            Self::MobileWalletTransfer => "MobileWalletTransfer",
            Self::BankTransferAlt => "BankTransferAlt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingReview,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "PendingReview",
            Self::Confirmed => "Confirmed",
        }
    }
}

pub struct NewOrder<'a> {
    pub product: &'a str,
    pub price: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub payment_method: PaymentMethod,
    pub payment_image: Option<String>,
}

/// Customer details read back after a confirmation, used to build the
/// notification text.
pub struct ConfirmedOrder {
    pub name: String,
    pub phone: String,
    pub product: String,
}

pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    Connection::open(path)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            price TEXT,
            description TEXT,
            image TEXT
        );
        CREATE TABLE IF NOT EXISTS orders(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product TEXT,
            price TEXT,
            name TEXT,
            phone TEXT,
            payment_image TEXT
        );",
    )?;

    // Late additions; pre-existing databases pick these up on restart.
    ensure_column(conn, "orders", "payment_method", "TEXT")?;
    ensure_column(conn, "orders", "status", "TEXT")?;

    Ok(())
}

/// Adds `column` to `table` only when it is not already there. Existing rows
/// read back NULL for the new column.
pub fn ensure_column(
    conn: &Connection,
    table: &str,
    column: &str,
    ty: &str,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(Result::ok)
        .any(|name| name == column);

    if !exists {
        conn.execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {ty}"), [])?;
    }

    Ok(())
}

pub fn insert_product(
    conn: &Connection,
    name: &str,
    price: &str,
    description: &str,
    image: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO products(name, price, description, image) VALUES (?1, ?2, ?3, ?4)",
        params![name, price, description, image],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn list_products(conn: &Connection) -> rusqlite::Result<Vec<Product>> {
    let mut stmt =
        conn.prepare("SELECT id, name, price, description, image FROM products")?;
    let rows = stmt.query_map([], |row| {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
        })
    })?;

    rows.collect()
}

/// Returns the number of rows removed; zero is not an error.
pub fn delete_product(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM products WHERE id = ?1", params![id])
}

pub fn insert_order(conn: &Connection, order: &NewOrder) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO orders(product, price, name, phone, payment_image, payment_method, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.product,
            order.price,
            order.name,
            order.phone,
            order.payment_image,
            order.payment_method.as_str(),
            OrderStatus::PendingReview.as_str(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn list_orders(conn: &Connection) -> rusqlite::Result<Vec<Order>> {
    let mut stmt = conn.prepare(
        "SELECT id, product, price, name, phone, payment_image, payment_method, status
         FROM orders",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Order {
            id: row.get(0)?,
            product: row.get(1)?,
            price: row.get(2)?,
            name: row.get(3)?,
            phone: row.get(4)?,
            payment_image: row.get(5)?,
            payment_method: row.get(6)?,
            status: row.get(7)?,
        })
    })?;

    rows.collect()
}

/// Flips the order to `Confirmed` and reads back the customer details. A
/// missing id updates zero rows and returns `None`; callers still report
/// success in that case.
pub fn confirm_order(conn: &Connection, id: i64) -> rusqlite::Result<Option<ConfirmedOrder>> {
    conn.execute(
        "UPDATE orders SET status = ?1 WHERE id = ?2",
        params![OrderStatus::Confirmed.as_str(), id],
    )?;

    conn.query_row(
        "SELECT name, phone, product FROM orders WHERE id = ?1",
        params![id],
        |row| {
            Ok(ConfirmedOrder {
                name: row.get(0)?,
                phone: row.get(1)?,
                product: row.get(2)?,
            })
        },
    )
    .optional()
}

pub fn delete_order(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM orders WHERE id = ?1", params![id])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})")).unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(Result::ok)
            .collect()
    }

    #[test]
    fn test_init_schema_twice() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let columns = column_names(&conn, "orders");
        assert_eq!(
            columns.iter().filter(|c| c.as_str() == "status").count(),
            1
        );
        assert_eq!(
            columns
                .iter()
                .filter(|c| c.as_str() == "payment_method")
                .count(),
            1
        );
    }

    #[test]
    fn test_migrates_legacy_orders_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE orders(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product TEXT,
                price TEXT,
                name TEXT,
                phone TEXT,
                payment_image TEXT
            );
            INSERT INTO orders(product, price, name, phone, payment_image)
            VALUES ('tea', '30', 'Omar', '0100', NULL);",
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let orders = list_orders(&conn).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].payment_method, None);
        assert_eq!(orders[0].status, None);
    }

    #[test]
    fn test_product_round_trip() {
        let conn = memory_db();

        let id = insert_product(&conn, "mug", "120", "ceramic mug", "products/mug.jpg").unwrap();

        let products = list_products(&conn).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, id);
        assert_eq!(products[0].name, "mug");
        assert_eq!(products[0].price, "120");
        assert_eq!(products[0].description, "ceramic mug");
        assert_eq!(products[0].image, "products/mug.jpg");

        assert_eq!(delete_product(&conn, id).unwrap(), 1);
        assert!(list_products(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_product_is_noop() {
        let conn = memory_db();
        assert_eq!(delete_product(&conn, 99).unwrap(), 0);
    }

    #[test]
    fn test_new_order_starts_pending() {
        let conn = memory_db();

        insert_order(
            &conn,
            &NewOrder {
                product: "mug",
                price: "120",
                name: "Sara",
                phone: "0101234567",
                payment_method: PaymentMethod::CashOnDelivery,
                payment_image: None,
            },
        )
        .unwrap();

        let orders = list_orders(&conn).unwrap();
        assert_eq!(orders[0].status.as_deref(), Some("PendingReview"));
        assert_eq!(orders[0].payment_method.as_deref(), Some("CashOnDelivery"));
        assert_eq!(orders[0].payment_image, None);
    }

    #[test]
    fn test_order_keeps_payment_image_path() {
        let conn = memory_db();

        insert_order(
            &conn,
            &NewOrder {
                product: "mug",
                price: "120",
                name: "Sara",
                phone: "0101234567",
                payment_method: PaymentMethod::MobileWalletTransfer,
                payment_image: Some("payments/receipt.jpg".to_string()),
            },
        )
        .unwrap();

        let orders = list_orders(&conn).unwrap();
        assert_eq!(
            orders[0].payment_image.as_deref(),
            Some("payments/receipt.jpg")
        );
    }

    #[test]
    fn test_confirm_order_is_idempotent() {
        let conn = memory_db();

        let id = insert_order(
            &conn,
            &NewOrder {
                product: "mug",
                price: "120",
                name: "Sara",
                phone: "0101234567",
                payment_method: PaymentMethod::CashOnDelivery,
                payment_image: None,
            },
        )
        .unwrap();

        let first = confirm_order(&conn, id).unwrap().unwrap();
        assert_eq!(first.name, "Sara");
        assert_eq!(first.phone, "0101234567");
        assert_eq!(first.product, "mug");

        let second = confirm_order(&conn, id).unwrap().unwrap();
        assert_eq!(second.name, "Sara");

        let orders = list_orders(&conn).unwrap();
        assert_eq!(orders[0].status.as_deref(), Some("Confirmed"));
    }

    #[test]
    fn test_confirm_missing_order_returns_none() {
        let conn = memory_db();
        assert!(confirm_order(&conn, 42).unwrap().is_none());
        assert!(list_orders(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_order_is_noop() {
        let conn = memory_db();
        assert_eq!(delete_order(&conn, 7).unwrap(), 0);
    }

    #[test]
    fn test_payment_method_tags() {
        assert_eq!(
            PaymentMethod::parse("CashOnDelivery"),
            Some(PaymentMethod::CashOnDelivery)
        );
        assert_eq!(
            PaymentMethod::parse("MobileWalletTransfer"),
            Some(PaymentMethod::MobileWalletTransfer)
        );
        assert_eq!(
            PaymentMethod::parse("BankTransferAlt"),
            Some(PaymentMethod::BankTransferAlt)
        );
        assert_eq!(PaymentMethod::parse("cod"), None);
    }
}

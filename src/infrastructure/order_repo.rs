use std::num::NonZeroU32;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLineItem, OrderStatus};
use crate::domain::order_table::OrderTable;
use crate::domain::ports::{OrderRepository, OrderTableRepository, Transaction, UnitOfWork};
use crate::schema::{menus, order_line_items, order_tables, orders};

use super::models::{
    NewMenuRow, NewOrderLineItemRow, NewOrderRow, NewOrderTableRow, OrderLineItemRow, OrderRow,
    OrderTableRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

/// Constraint names from the `create_orders` migration.
const ORDER_TABLE_FK: &str = "fk_orders_order_table";

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
                if info.constraint_name() == Some(ORDER_TABLE_FK) =>
            {
                DomainError::TableNotFound
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::MenuReference(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

fn to_i32<T>(value: T, field: &str) -> Result<i32, DomainError>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| DomainError::Internal(format!("{field} {value} does not fit the column")))
}

fn to_order(row: OrderRow, items: Vec<OrderLineItemRow>) -> Result<Order, DomainError> {
    let status = row
        .order_status
        .parse::<OrderStatus>()
        .map_err(|e| DomainError::Internal(format!("stored order {}: {e}", row.id)))?;
    let line_items = items
        .into_iter()
        .map(|item| {
            u32::try_from(item.quantity)
                .ok()
                .and_then(NonZeroU32::new)
                .map(|quantity| OrderLineItem::new(item.menu_id, quantity))
                .ok_or_else(|| {
                    DomainError::Internal(format!(
                        "stored line item {} has quantity {}",
                        item.id, item.quantity
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Order::from_parts(
        Some(row.id),
        row.order_table_id,
        status,
        row.ordered_time,
        line_items,
    )
    .map_err(|e| DomainError::Internal(format!("stored order {}: {e}", row.id)))
}

/// Attach line items to already loaded order rows, keeping row order.
fn load_orders(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    let items = OrderLineItemRow::belonging_to(&rows)
        .select(OrderLineItemRow::as_select())
        .order(order_line_items::position.asc())
        .load(conn)?;

    items
        .grouped_by(&rows)
        .into_iter()
        .zip(rows)
        .map(|(items, row)| to_order(row, items))
        .collect()
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselStore {
    pool: DbPool,
}

impl DieselStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a menu row; menus are otherwise managed outside this service.
    pub fn add_menu(&self, name: &str) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        diesel::insert_into(menus::table)
            .values(&NewMenuRow {
                id,
                name: name.to_string(),
            })
            .execute(&mut conn)?;
        Ok(id)
    }

    /// Insert a table row; tables are otherwise managed outside this service.
    pub fn add_table(&self, number_of_guests: u32, empty: bool) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        diesel::insert_into(order_tables::table)
            .values(&NewOrderTableRow {
                id,
                number_of_guests: to_i32(number_of_guests, "number_of_guests")?,
                empty,
            })
            .execute(&mut conn)?;
        Ok(id)
    }
}

impl UnitOfWork for DieselStore {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        conn.transaction::<_, DomainError, _>(|conn| work(&mut DieselTransaction { conn }))
    }
}

struct DieselTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl Transaction for DieselTransaction<'_> {
    fn tables(&mut self) -> &mut dyn OrderTableRepository {
        self
    }

    fn orders(&mut self) -> &mut dyn OrderRepository {
        self
    }
}

impl OrderTableRepository for DieselTransaction<'_> {
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<OrderTable>, DomainError> {
        let table = order_tables::table
            .filter(order_tables::id.eq(id))
            .select(OrderTableRow::as_select())
            .first(&mut *self.conn)
            .optional()?;

        let Some(table) = table else {
            return Ok(None);
        };

        let rows = OrderRow::belonging_to(&table)
            .select(OrderRow::as_select())
            .order((orders::ordered_time.asc(), orders::id.asc()))
            .load(&mut *self.conn)?;
        let placed = load_orders(&mut *self.conn, rows)?;

        let number_of_guests = u32::try_from(table.number_of_guests).map_err(|_| {
            DomainError::Internal(format!(
                "stored table {} has {} guests",
                table.id, table.number_of_guests
            ))
        })?;
        Ok(Some(OrderTable::new(
            table.id,
            number_of_guests,
            table.empty,
            placed,
        )))
    }
}

impl OrderRepository for DieselTransaction<'_> {
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut *self.conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(load_orders(&mut *self.conn, vec![row])?.pop())
    }

    fn find_by_id_for_update(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        // Line items never change, so locking the order row is enough.
        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .for_update()
            .first(&mut *self.conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(load_orders(&mut *self.conn, vec![row])?.pop())
    }

    fn save(&mut self, order: &mut Order) -> Result<(), DomainError> {
        if let Some(id) = order.id() {
            let updated = diesel::update(orders::table.find(id))
                .set((
                    orders::order_status.eq(order.status().as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(&mut *self.conn)?;
            if updated == 0 {
                return Err(DomainError::OrderNotFound);
            }
            return Ok(());
        }

        // 1. Insert the order
        let order_id = Uuid::new_v4();
        diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order_id,
                order_table_id: order.order_table_id(),
                order_status: order.status().to_string(),
                ordered_time: order.ordered_time(),
            })
            .execute(&mut *self.conn)?;

        // 2. Insert line items; the menu foreign key rejects unknown menus.
        let new_items = order
            .line_items()
            .iter()
            .enumerate()
            .map(|(position, item)| {
                Ok(NewOrderLineItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    menu_id: item.menu_id(),
                    position: to_i32(position, "position")?,
                    quantity: i64::from(item.quantity().get()),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        diesel::insert_into(order_line_items::table)
            .values(&new_items)
            .execute(&mut *self.conn)?;

        order.assign_id(order_id);
        Ok(())
    }

    fn find_all(&mut self) -> Result<Vec<Order>, DomainError> {
        let rows = orders::table
            .select(OrderRow::as_select())
            .order((orders::ordered_time.asc(), orders::id.asc()))
            .load(&mut *self.conn)?;
        load_orders(&mut *self.conn, rows)
    }
}

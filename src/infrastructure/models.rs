use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{menus, order_line_items, order_tables, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderTableRow {
    pub id: Uuid,
    pub number_of_guests: i32,
    pub empty: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_tables)]
pub struct NewOrderTableRow {
    pub id: Uuid,
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = menus)]
pub struct NewMenuRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = orders)]
#[diesel(belongs_to(OrderTableRow, foreign_key = order_table_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_table_id: Uuid,
    pub order_status: String,
    pub ordered_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_table_id: Uuid,
    pub order_status: String,
    pub ordered_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_line_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_id: Uuid,
    pub position: i32,
    pub quantity: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_line_items)]
pub struct NewOrderLineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_id: Uuid,
    pub position: i32,
    pub quantity: i64,
}

//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::domain::room::{Room, RoomRepository, RoomStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::room;

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: room::Model) -> DomainResult<Room> {
    let corrupt = |e: DomainError| {
        DomainError::Storage(format!("room {} row is corrupt: {}", m.room_number, e))
    };
    Ok(Room {
        room_number: m.room_number,
        room_type: m.room_type.parse().map_err(corrupt)?,
        price: m.price,
        status: m.status.parse().map_err(corrupt)?,
        created_at: m.created_at,
    })
}

fn models_to_domain(models: Vec<room::Model>) -> DomainResult<Vec<Room>> {
    models.into_iter().map(model_to_domain).collect()
}

pub(super) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Unique violations surface as `SqlErr` on most drivers; fall back to the
/// message text for the ones that don't classify them.
pub(super) fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || e.to_string().contains("UNIQUE constraint failed")
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn insert(&self, r: Room) -> DomainResult<()> {
        debug!("Inserting room: {}", r.room_number);

        let room_number = r.room_number;
        let model = room::ActiveModel {
            room_number: Set(r.room_number),
            room_type: Set(r.room_type.as_str().to_string()),
            price: Set(r.price),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
        };
        room::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateRoomNumber(room_number)
                } else {
                    db_err(e)
                }
            })?;
        Ok(())
    }

    async fn find_by_number(&self, room_number: i32) -> DomainResult<Option<Room>> {
        room::Entity::find_by_id(room_number)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_status(&self, status: RoomStatus) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::Status.eq(status.as_str()))
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn count(&self) -> DomainResult<u64> {
        room::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn delete_available(&self, room_number: i32) -> DomainResult<Room> {
        debug!("Deleting room: {}", room_number);

        let Some(existing) = self.find_by_number(room_number).await? else {
            return Err(DomainError::room_not_found(room_number));
        };

        let result = room::Entity::delete_many()
            .filter(room::Column::RoomNumber.eq(room_number))
            .filter(room::Column::Status.eq(RoomStatus::Available.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::RoomUnavailable(room_number));
        }
        Ok(existing)
    }
}

//! SeaORM implementation of ReservationRepository
//!
//! Reserve and cancel run in one transaction each. Every status change is a
//! guarded `UPDATE ... WHERE status = <expected>`; zero affected rows means
//! another caller got there first.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::room_repository::{db_err, is_unique_violation};
use crate::domain::reservation::{Reservation, ReservationRepository, ReservationStatus};
use crate::domain::room::RoomStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, room};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status: ReservationStatus = m.status.parse().map_err(|e| {
        DomainError::Storage(format!("reservation {} row is corrupt: {}", m.id, e))
    })?;
    Ok(Reservation {
        id: m.id,
        customer_name: m.customer_name,
        room_number: m.room_number,
        start_date: m.start_date,
        end_date: m.end_date,
        status,
        created_at: m.created_at,
        cancelled_at: m.cancelled_at,
    })
}

async fn find_model<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> DomainResult<Option<reservation::Model>> {
    reservation::Entity::find_by_id(id.to_string())
        .one(conn)
        .await
        .map_err(db_err)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn reserve(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!("Reserving room {} for reservation {}", r.room_number, r.id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let claimed = room::Entity::update_many()
            .col_expr(
                room::Column::Status,
                Expr::value(RoomStatus::Reserved.as_str()),
            )
            .filter(room::Column::RoomNumber.eq(r.room_number))
            .filter(room::Column::Status.eq(RoomStatus::Available.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if claimed.rows_affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(DomainError::RoomUnavailable(r.room_number));
        }

        let model = reservation::ActiveModel {
            id: Set(r.id.clone()),
            customer_name: Set(r.customer_name.clone()),
            room_number: Set(r.room_number),
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
            cancelled_at: Set(r.cancelled_at),
        };
        reservation::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::RoomUnavailable(r.room_number)
                } else {
                    db_err(e)
                }
            })?;

        txn.commit().await.map_err(db_err)?;
        Ok(r)
    }

    async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        debug!("Cancelling reservation: {}", id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let cancelled = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(ReservationStatus::Cancelled.as_str()),
            )
            .col_expr(reservation::Column::CancelledAt, Expr::value(Utc::now()))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Booked.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if cancelled.rows_affected == 0 {
            return match find_model(&txn, id).await? {
                Some(_) => Err(DomainError::AlreadyCancelled(id.to_string())),
                None => Err(DomainError::reservation_not_found(id)),
            };
        }

        let Some(model) = find_model(&txn, id).await? else {
            return Err(DomainError::reservation_not_found(id));
        };

        let released = room::Entity::update_many()
            .col_expr(
                room::Column::Status,
                Expr::value(RoomStatus::Available.as_str()),
            )
            .filter(room::Column::RoomNumber.eq(model.room_number))
            .filter(room::Column::Status.is_in([
                RoomStatus::Reserved.as_str(),
                RoomStatus::Booked.as_str(),
            ]))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if released.rows_affected == 0 {
            warn!(
                "Reservation {} cancelled but room {} was not held",
                id, model.room_number
            );
        }

        txn.commit().await.map_err(db_err)?;
        model_to_domain(model)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        find_model(&self.db, id)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(status.as_str()))
            .order_by_asc(reservation::Column::CreatedAt)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_active_for_room(&self, room_number: i32) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find()
            .filter(reservation::Column::RoomNumber.eq(room_number))
            .filter(reservation::Column::Status.eq(ReservationStatus::Booked.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::room::{Room, RoomRepository, RoomType};
    use crate::infrastructure::database::repositories::SeaOrmRoomRepository;
    use crate::infrastructure::database::test_connection;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn booking(room_number: i32, name: &str) -> Reservation {
        Reservation::new(room_number, name, date(1), date(4)).unwrap()
    }

    async fn setup() -> (SeaOrmRoomRepository, SeaOrmReservationRepository) {
        let db = test_connection().await;
        let rooms = SeaOrmRoomRepository::new(db.clone());
        rooms
            .insert(Room::new(1, RoomType::OneBedroom, 100.0).unwrap())
            .await
            .unwrap();
        (rooms, SeaOrmReservationRepository::new(db))
    }

    #[tokio::test]
    async fn reserve_claims_room() {
        let (rooms, reservations) = setup().await;

        let r = reservations.reserve(booking(1, "Alice")).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Booked);

        let room = rooms.find_by_number(1).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Reserved);

        let active = reservations.find_active_for_room(1).await.unwrap().unwrap();
        assert_eq!(active.id, r.id);
        assert_eq!(active.start_date, date(1));
    }

    #[tokio::test]
    async fn second_reserve_fails_without_writing() {
        let (_rooms, reservations) = setup().await;
        reservations.reserve(booking(1, "Alice")).await.unwrap();

        let err = reservations.reserve(booking(1, "Bob")).await.unwrap_err();
        assert!(matches!(err, DomainError::RoomUnavailable(1)));

        let booked = reservations
            .find_by_status(ReservationStatus::Booked)
            .await
            .unwrap();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].customer_name, "Alice");
    }

    #[tokio::test]
    async fn reserve_unknown_room_is_unavailable() {
        let (_rooms, reservations) = setup().await;
        let err = reservations
            .reserve(booking(99, "Alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RoomUnavailable(99)));
    }

    #[tokio::test]
    async fn cancel_releases_room_once() {
        let (rooms, reservations) = setup().await;
        let r = reservations.reserve(booking(1, "Alice")).await.unwrap();

        let cancelled = reservations.cancel(&r.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        let room = rooms.find_by_number(1).await.unwrap().unwrap();
        assert!(room.is_available());

        assert!(matches!(
            reservations.cancel(&r.id).await,
            Err(DomainError::AlreadyCancelled(_))
        ));
        assert!(matches!(
            reservations.cancel("no-such-id").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reserves_have_one_winner() {
        let (rooms, reservations) = setup().await;
        let reservations = Arc::new(reservations);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo = reservations.clone();
                tokio::spawn(async move {
                    repo.reserve(booking(1, &format!("Guest {}", i))).await
                })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(e) => assert!(matches!(e, DomainError::RoomUnavailable(1))),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(
            reservations
                .find_by_status(ReservationStatus::Booked)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            rooms.find_by_number(1).await.unwrap().unwrap().status,
            RoomStatus::Reserved
        );
    }
}

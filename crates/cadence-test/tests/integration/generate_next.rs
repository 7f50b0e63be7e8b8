//! Read, advance and commit as one unit of work.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use cadence_test::component::booking::{
    NewRecurrenceException, NewRecurringBooking, RecurringBookingService,
};
use cadence_test::component::error::{ErrorKind, ServiceError};
use cadence_test::component::notify::TracingNotifier;
use cadence_test::component::recurrence::ExpansionPolicy;
use cadence_test::component::store::{InMemoryStore, RecurringBookingStore};
use cadence_test::component::types::{BookingStatus, ExceptionType, Frequency};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn monthly_request(max_occurrences: Option<u32>) -> NewRecurringBooking {
    NewRecurringBooking {
        customer_id: Uuid::now_v7(),
        provider_id: Uuid::now_v7(),
        service_id: Uuid::now_v7(),
        frequency: Frequency::Monthly,
        start_time: NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
        duration_minutes: 45,
        first_occurrence_date: date(2024, 1, 31),
        end_date: None,
        max_occurrences,
    }
}

/// ## Summary
/// Concurrent generate-next calls on one booking produce exactly one commit.
#[test_log::test(tokio::test)]
async fn concurrent_generate_next_conflicts() {
    let store: Arc<dyn RecurringBookingStore> = Arc::new(InMemoryStore::new());
    let service = Arc::new(RecurringBookingService::new(
        Arc::clone(&store),
        Arc::new(TracingNotifier),
        ExpansionPolicy::default(),
    ));
    let booking = service
        .create(monthly_request(None))
        .await
        .expect("Failed to create booking");

    let booking_id = booking.id;
    let attempts = (0..16).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.generate_next(booking_id).await })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task should not panic"))
        .collect();

    let committed = results.iter().filter(|result| result.is_ok()).count();
    assert!(committed >= 1, "at least one advance commits");
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, ServiceError::Conflict(_)), "unexpected {err}");
        }
    }

    // Every successful commit moved the pointer exactly once.
    let stored = store.get_booking(booking.id).await.expect("booking exists");
    let count = usize::try_from(stored.occurrence_count).expect("count fits");
    assert_eq!(count, committed);
    assert_eq!(
        store
            .list_occurrences(booking.id)
            .await
            .expect("occurrences listed")
            .len(),
        committed
    );
}

/// ## Summary
/// Monthly bookings chain month-end clamping through repeated advances and
/// complete at the cap.
#[test_log::test(tokio::test)]
async fn monthly_advances_clamp_and_complete() {
    let service = RecurringBookingService::in_memory(ExpansionPolicy::default());
    let booking = service
        .create(monthly_request(Some(3)))
        .await
        .expect("Failed to create booking");

    service
        .put_exception(
            booking.id,
            date(2024, 2, 29),
            NewRecurrenceException {
                exception_type: ExceptionType::Skip,
                new_date: None,
                new_time: None,
                reason: Some("holiday".to_string()),
            },
        )
        .await
        .expect("Failed to store skip");

    let mut dates = Vec::new();
    loop {
        let advanced = service
            .generate_next(booking.id)
            .await
            .expect("Failed to advance");
        if let Some(occurrence) = advanced.occurrence {
            dates.push(occurrence.date);
        }
        if advanced.booking.status == BookingStatus::Completed {
            break;
        }
    }

    assert_eq!(
        dates,
        vec![date(2024, 1, 31), date(2024, 3, 29), date(2024, 4, 29)]
    );

    let completed = service.get(booking.id).await.expect("booking exists");
    assert_eq!(completed.occurrence_count, 3);
    assert_eq!(completed.next_occurrence_date, date(2024, 5, 29));

    let err = service.generate_next(booking.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert!(
        service
            .preview(booking.id, date(2024, 1, 1), date(2025, 1, 1))
            .await
            .expect("preview of completed booking")
            .is_empty()
    );
}

/// ## Summary
/// Preview after partial materialization starts from the pointer and matches
/// what the remaining advances produce.
#[test_log::test(tokio::test)]
async fn preview_tracks_the_pointer() {
    let service = RecurringBookingService::in_memory(ExpansionPolicy::default());
    let booking = service
        .create(monthly_request(Some(4)))
        .await
        .expect("Failed to create booking");

    service
        .generate_next(booking.id)
        .await
        .expect("Failed to advance");

    let remaining = service
        .preview(booking.id, date(2024, 1, 1), date(2025, 1, 1))
        .await
        .expect("Failed to preview");
    assert_eq!(remaining.len(), 3);
    assert_eq!(remaining[0].date, date(2024, 2, 29));

    let mut generated = Vec::new();
    for _ in 0..3 {
        let advanced = service
            .generate_next(booking.id)
            .await
            .expect("Failed to advance");
        generated.extend(advanced.occurrence);
    }
    assert_eq!(generated, remaining);
}

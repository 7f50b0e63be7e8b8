//! Shared expansion cases, run against the in-memory service instead of the
//! bare expander.

use cadence_test::component::booking::NewRecurringBooking;
use cadence_test::component::recurrence::{
    ExpansionPolicy, RecurrenceException, RecurrenceExpander, RecurringBooking,
};
use cadence_test::component::types::{BookingStatus, ExceptionType, Frequency};

include!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../cadence-service/tests/expansion_cases_data/mod.rs"
));

/// ## Summary
/// The bare expander agrees with every shared case.
#[test_log::test]
fn expansion_cases_expander() {
    for case in expansion_cases() {
        assert_case(&case);
    }
}

/// ## Summary
/// Storing a case's booking and exceptions through the service and previewing
/// it gives the same occurrences as the bare expander.
#[test_log::test(tokio::test)]
async fn expansion_cases_through_service() {
    for case in expansion_cases() {
        if case.occurrence_count > 0 {
            // The service only creates fresh bookings.
            continue;
        }

        let template = case_booking(&case);
        let service =
            cadence_test::component::booking::RecurringBookingService::in_memory(case.policy);
        let created = service
            .create(NewRecurringBooking {
                customer_id: template.customer_id,
                provider_id: template.provider_id,
                service_id: template.service_id,
                frequency: template.frequency,
                start_time: template.start_time,
                duration_minutes: template.duration_minutes,
                first_occurrence_date: template.next_occurrence_date,
                end_date: template.end_date,
                max_occurrences: template.max_occurrences,
            })
            .await
            .unwrap_or_else(|err| panic!("case {}: create failed: {err}", case.name));

        for exception in case_exceptions(&case, &created) {
            service
                .put_exception(
                    created.id,
                    exception.exception_date,
                    cadence_test::component::booking::NewRecurrenceException {
                        exception_type: exception.exception_type,
                        new_date: exception.new_date,
                        new_time: exception.new_time,
                        reason: exception.reason,
                    },
                )
                .await
                .unwrap_or_else(|err| panic!("case {}: exception rejected: {err}", case.name));
        }

        let previewed = service
            .preview(
                created.id,
                parse_case_date(case.range.0),
                parse_case_date(case.range.1),
            )
            .await
            .unwrap_or_else(|err| panic!("case {}: preview failed: {err}", case.name));

        let slots: Vec<(NaiveDate, NaiveTime)> = previewed
            .iter()
            .map(|occurrence| (occurrence.date, occurrence.start_time))
            .collect();
        let expected: Vec<(NaiveDate, NaiveTime)> = case
            .expected
            .iter()
            .map(|(date, time)| (parse_case_date(date), parse_case_time(time)))
            .collect();
        assert_eq!(slots, expected, "case {}", case.name);
    }
}

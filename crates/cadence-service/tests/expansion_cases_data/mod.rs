use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

pub struct ExceptionCase {
    pub date: &'static str,
    pub kind: ExceptionType,
    pub new_date: Option<&'static str>,
    pub new_time: Option<&'static str>,
}

pub struct ExpansionCase {
    pub name: &'static str,
    pub frequency: Frequency,
    pub start_time: &'static str,
    pub duration_minutes: u32,
    pub next_occurrence_date: &'static str,
    pub end_date: Option<&'static str>,
    pub max_occurrences: Option<u32>,
    pub occurrence_count: u32,
    pub exceptions: &'static [ExceptionCase],
    pub policy: ExpansionPolicy,
    pub range: (&'static str, &'static str),
    pub expected: &'static [(&'static str, &'static str)],
}

const fn skip(date: &'static str) -> ExceptionCase {
    ExceptionCase {
        date,
        kind: ExceptionType::Skip,
        new_date: None,
        new_time: None,
    }
}

const fn cancel(date: &'static str) -> ExceptionCase {
    ExceptionCase {
        date,
        kind: ExceptionType::Cancel,
        new_date: None,
        new_time: None,
    }
}

const fn reschedule(
    date: &'static str,
    new_date: &'static str,
    new_time: &'static str,
) -> ExceptionCase {
    ExceptionCase {
        date,
        kind: ExceptionType::Reschedule,
        new_date: Some(new_date),
        new_time: Some(new_time),
    }
}

const SKIP_AND_RESCHEDULE: &[ExceptionCase] = &[
    skip("2025-01-13"),
    reschedule("2025-01-20", "2025-01-22", "14:00"),
];

const CANCEL_SECOND_WEEK: &[ExceptionCase] = &[cancel("2025-01-13")];

const RESCHEDULE_OUT_OF_RANGE: &[ExceptionCase] =
    &[reschedule("2025-01-13", "2025-02-10", "12:00")];

#[expect(clippy::too_many_lines)]
pub fn expansion_cases() -> Vec<ExpansionCase> {
    vec![
        ExpansionCase {
            name: "weekly_skip_and_reschedule",
            frequency: Frequency::Weekly,
            start_time: "10:00",
            duration_minutes: 60,
            next_occurrence_date: "2025-01-06",
            end_date: Some("2025-01-27"),
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: SKIP_AND_RESCHEDULE,
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-01-31"),
            expected: &[("2025-01-06", "10:00"), ("2025-01-22", "14:00")],
        },
        ExpansionCase {
            name: "biweekly_basic",
            frequency: Frequency::Biweekly,
            start_time: "09:00",
            duration_minutes: 45,
            next_occurrence_date: "2025-01-06",
            end_date: None,
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-03-01"),
            expected: &[
                ("2025-01-06", "09:00"),
                ("2025-01-20", "09:00"),
                ("2025-02-03", "09:00"),
                ("2025-02-17", "09:00"),
            ],
        },
        ExpansionCase {
            name: "monthly_clamp_non_leap",
            frequency: Frequency::Monthly,
            start_time: "18:30",
            duration_minutes: 90,
            next_occurrence_date: "2025-01-31",
            end_date: None,
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-05-01"),
            expected: &[
                ("2025-01-31", "18:30"),
                ("2025-02-28", "18:30"),
                ("2025-03-28", "18:30"),
                ("2025-04-28", "18:30"),
            ],
        },
        ExpansionCase {
            name: "monthly_clamp_leap",
            frequency: Frequency::Monthly,
            start_time: "08:00",
            duration_minutes: 30,
            next_occurrence_date: "2024-01-31",
            end_date: None,
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2024-01-01", "2024-04-01"),
            expected: &[
                ("2024-01-31", "08:00"),
                ("2024-02-29", "08:00"),
                ("2024-03-29", "08:00"),
            ],
        },
        ExpansionCase {
            name: "quarterly_basic",
            frequency: Frequency::Quarterly,
            start_time: "11:15",
            duration_minutes: 120,
            next_occurrence_date: "2025-01-15",
            end_date: None,
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2026-01-16"),
            expected: &[
                ("2025-01-15", "11:15"),
                ("2025-04-15", "11:15"),
                ("2025-07-15", "11:15"),
                ("2025-10-15", "11:15"),
                ("2026-01-15", "11:15"),
            ],
        },
        ExpansionCase {
            name: "max_occurrences_exhausted",
            frequency: Frequency::Weekly,
            start_time: "10:00",
            duration_minutes: 60,
            next_occurrence_date: "2025-01-06",
            end_date: None,
            max_occurrences: Some(3),
            occurrence_count: 3,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-12-31"),
            expected: &[],
        },
        ExpansionCase {
            name: "cancel_does_not_use_slot",
            frequency: Frequency::Weekly,
            start_time: "10:00",
            duration_minutes: 60,
            next_occurrence_date: "2025-01-06",
            end_date: None,
            max_occurrences: Some(2),
            occurrence_count: 0,
            exceptions: CANCEL_SECOND_WEEK,
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-03-01"),
            expected: &[("2025-01-06", "10:00"), ("2025-01-20", "10:00")],
        },
        ExpansionCase {
            name: "cancel_uses_slot_when_configured",
            frequency: Frequency::Weekly,
            start_time: "10:00",
            duration_minutes: 60,
            next_occurrence_date: "2025-01-06",
            end_date: None,
            max_occurrences: Some(2),
            occurrence_count: 0,
            exceptions: CANCEL_SECOND_WEEK,
            policy: ExpansionPolicy {
                skip_consumes_slot: false,
                cancel_consumes_slot: true,
                max_candidates: 1000,
            },
            range: ("2025-01-01", "2025-03-01"),
            expected: &[("2025-01-06", "10:00")],
        },
        ExpansionCase {
            name: "end_date_is_exclusive",
            frequency: Frequency::Weekly,
            start_time: "07:45",
            duration_minutes: 15,
            next_occurrence_date: "2025-01-06",
            end_date: Some("2025-01-20"),
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: &[],
            policy: ExpansionPolicy::default(),
            range: ("2025-01-01", "2025-02-01"),
            expected: &[("2025-01-06", "07:45"), ("2025-01-13", "07:45")],
        },
        ExpansionCase {
            name: "reschedule_beyond_range",
            frequency: Frequency::Weekly,
            start_time: "10:00",
            duration_minutes: 60,
            next_occurrence_date: "2025-01-06",
            end_date: None,
            max_occurrences: None,
            occurrence_count: 0,
            exceptions: RESCHEDULE_OUT_OF_RANGE,
            policy: ExpansionPolicy::default(),
            range: ("2025-01-10", "2025-01-17"),
            expected: &[("2025-02-10", "12:00")],
        },
    ]
}

fn parse_case_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("case date is valid")
}

fn parse_case_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").expect("case time is valid")
}

pub fn case_booking(case: &ExpansionCase) -> RecurringBooking {
    RecurringBooking {
        id: Uuid::from_u128(0x00c0_ffee),
        customer_id: Uuid::from_u128(1),
        provider_id: Uuid::from_u128(2),
        service_id: Uuid::from_u128(3),
        frequency: case.frequency,
        status: BookingStatus::Active,
        start_time: parse_case_time(case.start_time),
        duration_minutes: case.duration_minutes,
        next_occurrence_date: parse_case_date(case.next_occurrence_date),
        end_date: case.end_date.map(parse_case_date),
        max_occurrences: case.max_occurrences,
        occurrence_count: case.occurrence_count,
        version: 0,
    }
}

pub fn case_exceptions(case: &ExpansionCase, booking: &RecurringBooking) -> Vec<RecurrenceException> {
    case.exceptions
        .iter()
        .enumerate()
        .map(|(index, exception)| RecurrenceException {
            id: Uuid::from_u128(0x1000 + index as u128),
            recurring_booking_id: booking.id,
            exception_date: parse_case_date(exception.date),
            exception_type: exception.kind,
            new_date: exception.new_date.map(parse_case_date),
            new_time: exception.new_time.map(parse_case_time),
            reason: None,
        })
        .collect()
}

pub fn assert_case(case: &ExpansionCase) {
    let booking = case_booking(case);
    let exceptions = case_exceptions(case, &booking);
    let expander = RecurrenceExpander::new(case.policy);

    let occurrences = expander
        .expand(
            &booking,
            &exceptions,
            parse_case_date(case.range.0),
            parse_case_date(case.range.1),
        )
        .unwrap_or_else(|err| panic!("case {} failed to expand: {err}", case.name));

    let actual: Vec<(NaiveDate, NaiveTime)> = occurrences
        .iter()
        .map(|occurrence| (occurrence.date, occurrence.start_time))
        .collect();
    let expected: Vec<(NaiveDate, NaiveTime)> = case
        .expected
        .iter()
        .map(|(date, time)| (parse_case_date(date), parse_case_time(time)))
        .collect();

    assert_eq!(actual, expected, "case {}", case.name);
    assert!(
        occurrences
            .iter()
            .all(|occurrence| occurrence.duration_minutes == case.duration_minutes),
        "case {}: duration carried through",
        case.name
    );
}

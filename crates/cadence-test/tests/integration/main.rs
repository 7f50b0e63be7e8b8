mod expansion_cases;
mod generate_next;
mod helpers;

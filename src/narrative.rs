//! The sentences shown next to charts
//!
//! Nothing is said about an empty selection. A zero total over rows that do
//! exist is still reported.

use rust_decimal::RoundingStrategy;

use crate::aggregate::{Countdown, DaysUntilPoint, EventDay, EventTotals, RepDay, RepShare, RepTotals};
use crate::sale::Money;

/// Formats an amount as dollars with thousands separators, e.g. `$1,234.50`
///
/// Half cents round away from zero.
pub fn dollars(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // at most 2 decimal places left, and 96 bits of mantissa fit an i128 after scaling
    let cents = rounded.mantissa() * 10i128.pow(2 - rounded.scale());
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

pub fn event_trend(days: &[EventDay]) -> Option<String> {
    let event = &days.first()?.event;
    let sales = days.iter().map(|d| d.sales).sum::<Money>();
    let tickets = days.iter().map(|d| d.tickets).sum::<u64>();

    Some(format!(
        "{event} has reached {} in total sales and {tickets} tickets sold.",
        dollars(sales)
    ))
}

pub fn rep_trend(days: &[RepDay]) -> Option<String> {
    let rep = &days.first()?.rep;
    let sales = days.iter().map(|d| d.sales).sum::<Money>();

    Some(format!("{rep} has reached {} in total sales.", dollars(sales)))
}

pub fn event_leader(totals: &[EventTotals]) -> Option<String> {
    let best = totals.iter().reduce(|best, e| if e.sales > best.sales { e } else { best })?;

    Some(format!(
        "{} leads all events with {} in total sales from {} orders.",
        best.event,
        dollars(best.sales),
        best.orders
    ))
}

/// Expects the reps sorted best first
pub fn rep_leader(totals: &[RepTotals]) -> Option<String> {
    let best = totals.first()?;

    Some(format!(
        "{} has reached {} in total sales from {} orders and {} tickets.",
        best.rep,
        dollars(best.sales),
        best.orders,
        best.tickets
    ))
}

pub fn top_reps(top: &[RepShare]) -> Vec<String> {
    top.iter()
        .map(|share| {
            format!(
                "{} leads {} with {:.1}% of sales ({}).",
                share.rep,
                share.event,
                share.percentage,
                dollars(share.sales)
            )
        })
        .collect()
}

/// Announces the next event still to come
pub fn next_event(countdown: &[Countdown]) -> Option<String> {
    let next = countdown
        .iter()
        .filter(|c| c.days_until >= 0)
        .min_by_key(|c| c.days_until)?;

    Some(match next.days_until {
        0 => format!("{} is today.", next.event),
        1 => format!("{} is tomorrow.", next.event),
        days => format!("{} is {days} days away.", next.event),
    })
}

/// Describes how far ahead of an event its sales usually come in
pub fn sales_cycle(points: &[DaysUntilPoint]) -> Option<String> {
    let earliest = points.iter().max_by_key(|p| p.days_until)?;
    let closest = points.iter().filter(|p| p.days_until >= 0).min_by_key(|p| p.days_until)?;

    Some(format!(
        "Events start selling {} days ahead and average {} in sales {} days before the event.",
        earliest.days_until,
        dollars(Money::try_from(closest.sales).unwrap_or_default()),
        closest.days_until
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(sales: f64, tickets: u64) -> EventDay {
        EventDay {
            event: "5/9 v.s. Liberty".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            sales: sales.to_string().parse().unwrap(),
            orders: 1,
            tickets,
            rows: 1,
        }
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(dollars(Money::ZERO), "$0.00");
        assert_eq!(dollars(Money::from(150)), "$150.00");
        assert_eq!(dollars(Money::new(12345, 1)), "$1,234.50");
        assert_eq!(dollars(Money::from(1_000_000)), "$1,000,000.00");
        assert_eq!(dollars(Money::new(-2025, 2)), "-$20.25");
        assert_eq!(dollars(Money::new(19995, 3)), "$20.00");
        assert_eq!(dollars(Money::new(-5, 3)), "-$0.01");
    }

    #[test]
    fn dollars_of_extreme_amounts() {
        assert_eq!(dollars(Money::MAX), "$79,228,162,514,264,337,593,543,950,335.00");
        assert_eq!(dollars(Money::MIN), "-$79,228,162,514,264,337,593,543,950,335.00");
        assert_eq!(dollars(Money::new(1, 28)), "$0.00");
    }

    #[test]
    fn sales_cycle_summary() {
        let point = |days_until, sales| DaysUntilPoint {
            days_until,
            sales,
            orders: 1.0,
            tickets: 1.0,
            events: 1,
        };

        let text = sales_cycle(&[point(-2, 500.0), point(3, 420.5), point(40, 10.0)]).unwrap();
        assert_eq!(
            text,
            "Events start selling 40 days ahead and average $420.50 in sales 3 days before the event."
        );
        assert_eq!(sales_cycle(&[point(-2, 500.0)]), None);
    }

    #[test]
    fn event_trend_total() {
        let text = event_trend(&[day(100.0, 2), day(50.0, 3)]).unwrap();
        assert_eq!(text, "5/9 v.s. Liberty has reached $150.00 in total sales and 5 tickets sold.");
    }

    #[test]
    fn silent_on_empty_selections() {
        assert_eq!(event_trend(&[]), None);
        assert_eq!(rep_trend(&[]), None);
        assert_eq!(event_leader(&[]), None);
        assert_eq!(rep_leader(&[]), None);
        assert!(top_reps(&[]).is_empty());
        assert_eq!(next_event(&[]), None);
        assert_eq!(sales_cycle(&[]), None);
    }

    #[test]
    fn zero_sales_are_reported() {
        let text = event_trend(&[day(0.0, 4)]).unwrap();
        assert!(text.contains("$0.00"));
    }

    #[test]
    fn next_event_skips_past_events() {
        let countdown = |event: &str, days_until| Countdown {
            event: event.to_owned(),
            event_date: NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
            days_until,
        };

        let text = next_event(&[countdown("a", -3), countdown("b", 12), countdown("c", 1)]);
        assert_eq!(text.as_deref(), Some("c is tomorrow."));
        assert_eq!(next_event(&[countdown("a", -3)]), None);
    }
}

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::labels::EventLabels;
use crate::sale::{as_f64, AccountId, Money, Sale};

/// The number of rows a rep needs across the whole table to show up anywhere
pub const MIN_REP_ROWS: usize = 30;

/// The measures of a group of sales
///
/// `orders` counts distinct accounts. `rows` is the plain number of rows and
/// is at least as large as `orders`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measures {
    pub sales: Money,
    pub orders: usize,
    pub tickets: u64,
    pub rows: usize,
}

#[derive(Debug, Default)]
struct Tally<'a> {
    sales: Money,
    accounts: HashSet<&'a AccountId>,
    tickets: u64,
    rows: usize,
}

impl<'a> Tally<'a> {
    fn add(&mut self, sale: &'a Sale) {
        self.sales += sale.block_full_price();
        self.accounts.insert(sale.account());
        self.tickets += u64::from(sale.num_seats());
        self.rows += 1;
    }

    fn measures(&self) -> Measures {
        Measures {
            sales: self.sales,
            orders: self.accounts.len(),
            tickets: self.tickets,
            rows: self.rows,
        }
    }
}

/// The measure reps are ranked by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Measure {
    #[default]
    Sales,
    Orders,
    Tickets,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown measure {0:?}, expected one of sales, orders, tickets")]
pub struct UnknownMeasure(String);

impl FromStr for Measure {
    type Err = UnknownMeasure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sales" => Ok(Measure::Sales),
            "orders" => Ok(Measure::Orders),
            "tickets" => Ok(Measure::Tickets),
            _ => Err(UnknownMeasure(s.to_owned())),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Measure::Sales => "sales",
            Measure::Orders => "orders",
            Measure::Tickets => "tickets",
        })
    }
}

/// The sales of one event on one day
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EventDay {
    pub event: String,
    pub date: NaiveDate,
    pub sales: Money,
    pub orders: usize,
    pub tickets: u64,
    pub rows: usize,
}

/// The sales of one rep on one day
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RepDay {
    pub rep: String,
    pub date: NaiveDate,
    pub sales: Money,
    pub orders: usize,
    pub tickets: u64,
    pub rows: usize,
}

/// The cumulative sales of one event
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EventTotals {
    pub event: String,
    pub sales: Money,
    pub orders: usize,
    pub tickets: u64,
    pub rows: usize,
}

/// The cumulative sales of one rep
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RepTotals {
    pub rep: String,
    pub sales: Money,
    pub orders: usize,
    pub tickets: u64,
    pub rows: usize,
}

impl RepTotals {
    fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Sales => as_f64(self.sales),
            Measure::Orders => self.orders as f64,
            Measure::Tickets => self.tickets as f64,
        }
    }
}

/// The part a rep contributed to the sales of an event
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RepShare {
    pub event: String,
    pub rep: String,
    pub sales: Money,
    /// Share of the event's sales, in percent
    pub percentage: f64,
}

/// The average cumulative sales of all events at a given distance to the event
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DaysUntilPoint {
    /// Days left until the event, negative once it took place
    pub days_until: i64,
    pub sales: f64,
    pub orders: f64,
    pub tickets: f64,
    /// The number of events averaged over
    pub events: usize,
}

/// The distance of an event to a reference day
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Countdown {
    pub event: String,
    pub event_date: NaiveDate,
    pub days_until: i64,
}

/// The reps with at least [`MIN_REP_ROWS`] rows in `sales`
pub fn eligible_reps(sales: &[Sale]) -> HashSet<&str> {
    let mut rows = HashMap::<&str, usize>::new();
    for sale in sales {
        *rows.entry(sale.rep()).or_default() += 1;
    }

    rows.into_iter()
        .filter(|(_, rows)| *rows >= MIN_REP_ROWS)
        .map(|(rep, _)| rep)
        .collect()
}

/// The sales attributed to eligible reps
fn eligible_sales(sales: &[Sale]) -> impl Iterator<Item = &Sale> {
    let reps = eligible_reps(sales);
    sales.iter().filter(move |sale| reps.contains(sale.rep()))
}

/// The display names of all events with sales, in chronological order
pub fn event_names(sales: &[Sale], labels: &EventLabels) -> Vec<String> {
    let mut names = sales
        .iter()
        .map(|sale| labels.label_for(sale.event_code()))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    names.sort_by_key(|name| labels.order_key(*name));

    names.into_iter().map(str::to_owned).collect()
}

/// The names of all eligible reps, sorted alphabetically
pub fn rep_names(sales: &[Sale]) -> Vec<String> {
    let mut names = eligible_reps(sales)
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    names.sort();
    names
}

/// The daily sales of a single event, by its display name
pub fn event_daily(sales: &[Sale], labels: &EventLabels, event: &str) -> Vec<EventDay> {
    let mut days = BTreeMap::<NaiveDate, Tally>::new();
    for sale in sales.iter().filter(|sale| labels.label_for(sale.event_code()) == event) {
        days.entry(sale.day()).or_default().add(sale);
    }

    days.into_iter()
        .map(|(date, tally)| {
            let m = tally.measures();
            EventDay {
                event: event.to_owned(),
                date,
                sales: m.sales,
                orders: m.orders,
                tickets: m.tickets,
                rows: m.rows,
            }
        })
        .collect()
}

/// The daily sales of a single rep
/// Reps below the eligibility threshold yield no rows.
pub fn rep_daily(sales: &[Sale], rep: &str) -> Vec<RepDay> {
    let mut days = BTreeMap::<NaiveDate, Tally>::new();
    for sale in eligible_sales(sales).filter(|sale| sale.rep() == rep) {
        days.entry(sale.day()).or_default().add(sale);
    }

    days.into_iter()
        .map(|(date, tally)| {
            let m = tally.measures();
            RepDay {
                rep: rep.to_owned(),
                date,
                sales: m.sales,
                orders: m.orders,
                tickets: m.tickets,
                rows: m.rows,
            }
        })
        .collect()
}

/// The total sales of every event, in chronological order
pub fn event_totals(sales: &[Sale], labels: &EventLabels) -> Vec<EventTotals> {
    let mut events = HashMap::<&str, Tally>::new();
    for sale in sales {
        events.entry(labels.label_for(sale.event_code())).or_default().add(sale);
    }

    let mut totals = events
        .into_iter()
        .map(|(event, tally)| {
            let m = tally.measures();
            EventTotals {
                event: event.to_owned(),
                sales: m.sales,
                orders: m.orders,
                tickets: m.tickets,
                rows: m.rows,
            }
        })
        .collect::<Vec<_>>();
    totals.sort_by(|a, b| labels.order_key(&a.event).cmp(&labels.order_key(&b.event)));
    totals
}

/// The total sales of every eligible rep, best first
///
/// Reps with equal measures are sorted by name.
pub fn rep_totals(sales: &[Sale], by: Measure) -> Vec<RepTotals> {
    let mut reps = HashMap::<&str, Tally>::new();
    for sale in eligible_sales(sales) {
        reps.entry(sale.rep()).or_default().add(sale);
    }

    let mut totals = reps
        .into_iter()
        .map(|(rep, tally)| {
            let m = tally.measures();
            RepTotals {
                rep: rep.to_owned(),
                sales: m.sales,
                orders: m.orders,
                tickets: m.tickets,
                rows: m.rows,
            }
        })
        .collect::<Vec<_>>();
    totals.sort_by(|a, b| {
        b.measure(by)
            .total_cmp(&a.measure(by))
            .then_with(|| a.rep.cmp(&b.rep))
    });
    totals
}

/// The share every eligible rep has in the sales of each event
///
/// Rows are ordered chronologically by event, then by rep name. If an event
/// sold nothing, every share of it is zero.
pub fn rep_shares(sales: &[Sale], labels: &EventLabels) -> Vec<RepShare> {
    let mut groups = BTreeMap::<(&str, &str), Money>::new();
    let mut event_totals = HashMap::<&str, Money>::new();
    for sale in eligible_sales(sales) {
        let event = labels.label_for(sale.event_code());
        *groups.entry((event, sale.rep())).or_insert(Money::ZERO) += sale.block_full_price();
        *event_totals.entry(event).or_insert(Money::ZERO) += sale.block_full_price();
    }

    let mut shares = groups
        .into_iter()
        .map(|((event, rep), sales)| {
            let total = event_totals.get(event).copied().unwrap_or(Money::ZERO);
            let percentage = match total == Money::ZERO {
                true => 0.0,
                false => as_f64(sales / total * Money::ONE_HUNDRED),
            };
            RepShare {
                event: event.to_owned(),
                rep: rep.to_owned(),
                sales,
                percentage,
            }
        })
        .collect::<Vec<_>>();
    // stable, so reps stay sorted by name within an event
    shares.sort_by(|a, b| labels.order_key(&a.event).cmp(&labels.order_key(&b.event)));
    shares
}

/// The rep with the highest sales for each event
///
/// Expects the ordering produced by [`rep_shares`]. On a tie the first rep
/// in that ordering wins, which is the alphabetically first one.
pub fn top_reps(shares: &[RepShare]) -> Vec<RepShare> {
    let mut top: Vec<RepShare> = Vec::new();
    for share in shares {
        match top.last_mut() {
            Some(current) if current.event == share.event => {
                if share.sales > current.sales {
                    *current = share.clone();
                }
            }
            _ => top.push(share.clone()),
        }
    }
    top
}

#[derive(Debug, Default)]
struct PointSums {
    sales: f64,
    orders: f64,
    tickets: f64,
    events: usize,
}

impl PointSums {
    fn add(&mut self, measures: Measures) {
        self.sales += as_f64(measures.sales);
        self.orders += measures.orders as f64;
        self.tickets += measures.tickets as f64;
        self.events += 1;
    }
}

fn averaged(points: BTreeMap<i64, PointSums>) -> Vec<DaysUntilPoint> {
    points
        .into_iter()
        .map(|(days_until, sums)| {
            let n = sums.events as f64;
            DaysUntilPoint {
                days_until,
                sales: sums.sales / n,
                orders: sums.orders / n,
                tickets: sums.tickets / n,
                events: sums.events,
            }
        })
        .collect()
}

/// The average cumulative sales of all events, by the days left from `today` until each event
///
/// Every event contributes its totals of all sales made up to and including
/// `today`, averaged with the other events taking place the same number of
/// days from now. Past events have a negative distance. Events without a
/// known date, or without any sales yet, are skipped.
pub fn days_until_event(sales: &[Sale], labels: &EventLabels, today: NaiveDate) -> Vec<DaysUntilPoint> {
    let mut events = HashMap::<&str, Tally>::new();
    for sale in sales.iter().filter(|sale| sale.day() <= today) {
        events.entry(sale.event_code()).or_default().add(sale);
    }

    let mut points = BTreeMap::<i64, PointSums>::new();
    for (code, tally) in events {
        match labels.event_date(code) {
            Some(event_date) => points
                .entry((event_date - today).num_days())
                .or_default()
                .add(tally.measures()),
            None => log::debug!("skipping event {} without a date", code),
        }
    }

    averaged(points)
}

/// The average sales curve of all events, aligned on the days between each sale and its event
///
/// For every event, the running totals are taken on each day it sold
/// something. Those are then averaged over all events selling at the same
/// distance to their event day. Events without a known date are skipped.
pub fn sales_cycle(sales: &[Sale], labels: &EventLabels) -> Vec<DaysUntilPoint> {
    let mut events = HashMap::<&str, BTreeMap<NaiveDate, Vec<&Sale>>>::new();
    for sale in sales {
        events
            .entry(sale.event_code())
            .or_default()
            .entry(sale.day())
            .or_default()
            .push(sale);
    }

    let mut points = BTreeMap::<i64, PointSums>::new();
    for (code, days) in events {
        let event_date = match labels.event_date(code) {
            Some(date) => date,
            None => {
                log::debug!("skipping event {} without a date", code);
                continue;
            }
        };

        let mut running = Tally::default();
        for (day, day_sales) in days {
            for sale in day_sales {
                running.add(sale);
            }
            points
                .entry((event_date - day).num_days())
                .or_default()
                .add(running.measures());
        }
    }

    averaged(points)
}

/// The days left between `today` and every event with sales
///
/// Negative for events that already took place.
pub fn countdown(sales: &[Sale], labels: &EventLabels, today: NaiveDate) -> Vec<Countdown> {
    let codes = sales.iter().map(Sale::event_code).collect::<HashSet<_>>();
    let mut countdown = codes
        .into_iter()
        .filter_map(|code| {
            let event_date = labels.event_date(code)?;
            Some(Countdown {
                event: labels.label_for(code).to_owned(),
                event_date,
                days_until: (event_date - today).num_days(),
            })
        })
        .collect::<Vec<_>>();
    countdown.sort_by(|a, b| {
        labels
            .order_key(&a.event)
            .cmp(&labels.order_key(&b.event))
            .then(a.event_date.cmp(&b.event_date))
    });
    countdown
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::labels::EventLabel;
    use crate::loader::parse_timestamp;

    pub(crate) fn sale(event: &str, added: &str, price: f64, seats: u32, account: &str, rep: &str) -> Sale {
        Sale::new(
            event,
            parse_timestamp(added).unwrap(),
            price.to_string().parse().unwrap(),
            seats,
            AccountId::new(account),
            rep,
        )
    }

    /// `n` single seat sales of 10 for a rep, spread over two events and a few days
    pub(crate) fn rep_sales(rep: &str, n: usize) -> Vec<Sale> {
        (0..n)
            .map(|i| {
                let event = if i % 3 == 0 { "E240514" } else { "E240509" };
                let added = format!("2024-04-{:02} 12:00:00", 1 + i % 5);
                sale(event, &added, 10.0, 1, &format!("{rep}-{}", i % 7), rep)
            })
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn orders_count_distinct_accounts() {
        let sales = vec![
            sale("E240509", "2024-04-01 10:00:00", 100.0, 2, "1", "Ana Ortiz"),
            sale("E240509", "2024-04-01 15:00:00", 50.0, 3, "1", "Ana Ortiz"),
        ];
        let labels = EventLabels::builtin();

        let days = event_daily(&sales, &labels, "5/9 v.s. Liberty");
        assert_eq!(
            days,
            vec![EventDay {
                event: "5/9 v.s. Liberty".to_owned(),
                date: date("2024-04-01"),
                sales: Money::from(150),
                orders: 1,
                tickets: 5,
                rows: 2,
            }]
        );
    }

    #[test]
    fn event_daily_is_chronological() {
        let sales = vec![
            sale("E240509", "2024-04-03 10:00:00", 10.0, 1, "1", "a"),
            sale("E240509", "2024-04-01 10:00:00", 20.0, 1, "2", "a"),
            sale("E240514", "2024-04-02 10:00:00", 30.0, 1, "3", "a"),
            sale("E240509", "2024-04-03 18:00:00", 40.0, 1, "4", "a"),
        ];

        let days = event_daily(&sales, &EventLabels::builtin(), "5/9 v.s. Liberty");
        let days = days.iter().map(|d| (d.date, d.sales)).collect::<Vec<_>>();
        assert_eq!(
            days,
            [
                (date("2024-04-01"), Money::from(20)),
                (date("2024-04-03"), Money::from(50)),
            ]
        );
    }

    #[test]
    fn event_daily_by_unknown_code() {
        let sales = vec![sale("E999999", "2024-04-03 10:00:00", 10.0, 1, "1", "a")];

        let days = event_daily(&sales, &EventLabels::builtin(), "E999999");
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].event, "E999999");
    }

    #[test]
    fn empty_selections() {
        let labels = EventLabels::builtin();

        assert!(event_daily(&[], &labels, "5/9 v.s. Liberty").is_empty());
        assert!(rep_daily(&[], "Ana Ortiz").is_empty());
        assert!(event_totals(&[], &labels).is_empty());
        assert!(rep_totals(&[], Measure::Sales).is_empty());
        assert!(rep_shares(&[], &labels).is_empty());
        assert!(top_reps(&[]).is_empty());
        assert!(days_until_event(&[], &labels, date("2024-05-01")).is_empty());
        assert!(sales_cycle(&[], &labels).is_empty());
        assert!(countdown(&[], &labels, date("2024-05-01")).is_empty());
    }

    #[test]
    fn thin_reps_are_excluded() {
        let mut sales = rep_sales("Ana Ortiz", MIN_REP_ROWS);
        sales.extend(rep_sales("Bo Chen", 10));

        assert_eq!(rep_names(&sales), ["Ana Ortiz"]);
        let totals = rep_totals(&sales, Measure::Sales);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].rep, "Ana Ortiz");
        assert!(rep_daily(&sales, "Bo Chen").is_empty());
        assert!(rep_shares(&sales, &EventLabels::builtin())
            .iter()
            .all(|share| share.rep != "Bo Chen"));
    }

    #[test]
    fn eligibility_is_monotonic() {
        let mut sales = rep_sales("Ana Ortiz", MIN_REP_ROWS - 1);
        assert!(eligible_reps(&sales).is_empty());

        for n in 0..5 {
            sales.push(sale("E240509", "2024-04-09 12:00:00", 1.0, 1, &n.to_string(), "Ana Ortiz"));
            assert!(eligible_reps(&sales).contains("Ana Ortiz"));
        }
    }

    #[test]
    fn rep_daily_matches_totals() {
        let sales = rep_sales("Ana Ortiz", 40);

        let days = rep_daily(&sales, "Ana Ortiz");
        assert_eq!(days.len(), 5);
        let sum = days.iter().map(|d| d.sales).sum::<Money>();
        assert_eq!(sum, rep_totals(&sales, Measure::Sales)[0].sales);
    }

    #[test]
    fn event_totals_follow_declaration_order() {
        let sales = vec![
            sale("E999999", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
            sale("E240514", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
            sale("E240509", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
            sale("E240719", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
        ];

        let labels = EventLabels::builtin();
        let events = event_totals(&sales, &labels)
            .into_iter()
            .map(|e| e.event)
            .collect::<Vec<_>>();
        assert_eq!(events, ["5/9 v.s. Liberty", "5/14 v.s. Sky", "7/19 v.s. Mystics", "E999999"]);
        assert_eq!(event_names(&sales, &labels), events);
    }

    #[test]
    fn event_totals_match_daily_trend() {
        let mut sales = rep_sales("Ana Ortiz", 45);
        sales.extend(rep_sales("Bo Chen", 12));
        let labels = EventLabels::builtin();

        for totals in event_totals(&sales, &labels) {
            let days = event_daily(&sales, &labels, &totals.event);
            assert_eq!(days.iter().map(|d| d.sales).sum::<Money>(), totals.sales);
            assert_eq!(days.iter().map(|d| d.tickets).sum::<u64>(), totals.tickets);
            assert_eq!(days.iter().map(|d| d.rows).sum::<usize>(), totals.rows);
            assert!(totals.orders <= totals.rows);
        }
    }

    #[test]
    fn rep_totals_sorted_by_measure() {
        let mut sales = rep_sales("Ana Ortiz", 30);
        sales.extend(rep_sales("Bo Chen", 31));
        sales.extend(rep_sales("Cy Diaz", 30));
        // one big block for Cy
        sales.push(sale("E240509", "2024-04-01 10:00:00", 1000.0, 1, "x", "Cy Diaz"));

        let by_sales = rep_totals(&sales, Measure::Sales)
            .into_iter()
            .map(|r| r.rep)
            .collect::<Vec<_>>();
        assert_eq!(by_sales, ["Cy Diaz", "Bo Chen", "Ana Ortiz"]);

        // Ana and Bo both have 7 distinct accounts, Cy has 8
        let by_orders = rep_totals(&sales, Measure::Orders)
            .into_iter()
            .map(|r| (r.rep, r.orders))
            .collect::<Vec<_>>();
        assert_eq!(
            by_orders,
            [
                ("Cy Diaz".to_owned(), 8),
                ("Ana Ortiz".to_owned(), 7),
                ("Bo Chen".to_owned(), 7),
            ]
        );
    }

    #[test]
    fn shares_add_up() {
        let mut sales = rep_sales("Ana Ortiz", 30);
        sales.extend(rep_sales("Bo Chen", 33));
        sales.push(sale("E240509", "2024-04-01 10:00:00", 123.45, 1, "x", "Bo Chen"));

        let shares = rep_shares(&sales, &EventLabels::builtin());
        let mut per_event = HashMap::<&str, f64>::new();
        for share in &shares {
            *per_event.entry(&share.event).or_default() += share.percentage;
        }

        assert_eq!(per_event.len(), 2);
        for total in per_event.values() {
            assert!((total - 100.0).abs() < 1e-9, "{total}");
        }
    }

    #[test]
    fn zero_sales_events_have_zero_shares() {
        let mut sales = rep_sales("Ana Ortiz", 30);
        sales.extend(rep_sales("Bo Chen", 30));
        for sale in &mut sales {
            sale.block_full_price = Money::ZERO;
        }

        let shares = rep_shares(&sales, &EventLabels::builtin());
        assert!(!shares.is_empty());
        assert!(shares.iter().all(|share| share.percentage == 0.0));
    }

    #[test]
    fn top_rep_per_event() {
        let mut sales = rep_sales("Ana Ortiz", 30);
        sales.extend(rep_sales("Bo Chen", 30));
        sales.push(sale("E240514", "2024-04-01 10:00:00", 5.0, 1, "x", "Bo Chen"));

        let labels = EventLabels::builtin();
        let top = top_reps(&rep_shares(&sales, &labels))
            .into_iter()
            .map(|share| (share.event, share.rep))
            .collect::<Vec<_>>();

        // 5/9 is a tie, broken by name
        assert_eq!(
            top,
            [
                ("5/9 v.s. Liberty".to_owned(), "Ana Ortiz".to_owned()),
                ("5/14 v.s. Sky".to_owned(), "Bo Chen".to_owned()),
            ]
        );
    }

    #[test]
    fn sales_cycle_averages_running_totals() {
        let sales = vec![
            // event on 5/9, sales 3 and 1 days ahead
            sale("E240509", "2024-05-06 10:00:00", 100.0, 2, "1", "a"),
            sale("E240509", "2024-05-08 10:00:00", 50.0, 1, "1", "a"),
            // event on 5/14, sales 3 days ahead and on the day
            sale("E240514", "2024-05-11 10:00:00", 300.0, 4, "2", "a"),
            sale("E240514", "2024-05-14 10:00:00", 10.0, 1, "3", "a"),
            // no date to align on
            sale("GALA", "2024-05-01 10:00:00", 999.0, 9, "4", "a"),
        ];

        let points = sales_cycle(&sales, &EventLabels::builtin());
        assert_eq!(
            points,
            vec![
                DaysUntilPoint { days_until: 0, sales: 310.0, orders: 2.0, tickets: 5.0, events: 1 },
                DaysUntilPoint { days_until: 1, sales: 150.0, orders: 1.0, tickets: 3.0, events: 1 },
                DaysUntilPoint { days_until: 3, sales: 200.0, orders: 1.0, tickets: 3.0, events: 2 },
            ]
        );
    }

    #[test]
    fn sales_cycle_may_be_negative() {
        let sales = vec![sale("E240509", "2024-05-10 10:00:00", 100.0, 2, "1", "a")];

        let points = sales_cycle(&sales, &EventLabels::builtin());
        assert_eq!(points[0].days_until, -1);
    }

    #[test]
    fn days_until_averages_events_with_the_same_distance() {
        let labels = EventLabels::new(vec![
            EventLabel::new("E240509", "5/9 v.s. Liberty"),
            EventLabel::new("E240514", "5/14 v.s. Sky"),
            EventLabel::new("GALA", "Gala").with_date(date("2024-05-09")),
            EventLabel::new("E240720", "7/20 v.s. Sparks"),
        ])
        .unwrap();
        let sales = vec![
            // 8 days away
            sale("E240509", "2024-04-20 10:00:00", 100.0, 2, "1", "a"),
            sale("E240509", "2024-04-30 10:00:00", 50.0, 1, "2", "a"),
            sale("GALA", "2024-04-25 10:00:00", 30.0, 3, "3", "a"),
            // not sold yet
            sale("GALA", "2024-05-02 10:00:00", 999.0, 9, "4", "a"),
            // 13 days away
            sale("E240514", "2024-05-01 18:00:00", 20.0, 1, "5", "a"),
            // nothing sold up to today
            sale("E240720", "2024-06-01 10:00:00", 10.0, 1, "6", "a"),
        ];

        let points = days_until_event(&sales, &labels, date("2024-05-01"));
        assert_eq!(
            points,
            vec![
                DaysUntilPoint { days_until: 8, sales: 90.0, orders: 1.5, tickets: 3.0, events: 2 },
                DaysUntilPoint { days_until: 13, sales: 20.0, orders: 1.0, tickets: 1.0, events: 1 },
            ]
        );
    }

    #[test]
    fn days_until_of_past_events_is_negative() {
        let sales = vec![sale("E240509", "2024-05-01 10:00:00", 10.0, 1, "1", "a")];

        let points = days_until_event(&sales, &EventLabels::builtin(), date("2024-05-12"));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].days_until, -3);
    }

    #[test]
    fn countdown_to_events() {
        let sales = vec![
            sale("E240514", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
            sale("E240509", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
            sale("GALA", "2024-04-01 10:00:00", 1.0, 1, "1", "a"),
        ];

        let countdown = countdown(&sales, &EventLabels::builtin(), date("2024-05-10"));
        let countdown = countdown
            .into_iter()
            .map(|c| (c.event, c.days_until))
            .collect::<Vec<_>>();
        assert_eq!(
            countdown,
            [("5/9 v.s. Liberty".to_owned(), -1), ("5/14 v.s. Sky".to_owned(), 4)]
        );
    }

    #[test]
    fn parse_measures() {
        assert_eq!("Sales".parse::<Measure>().unwrap(), Measure::Sales);
        assert_eq!("orders".parse::<Measure>().unwrap(), Measure::Orders);
        assert_eq!("tickets".parse::<Measure>().unwrap(), Measure::Tickets);
        assert!("revenue".parse::<Measure>().is_err());
    }
}

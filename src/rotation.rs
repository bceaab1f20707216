//! Sport rotation — which sports to poll this cycle.
//!
//! The odds provider's quota allows tracking a fixed number of sports
//! per cycle, so the engine rotates through a static priority-ordered
//! catalog: tier 1 long-season sports first, tier 2 seasonal sports
//! next, tier 3 alternates to fill gaps. Selection is a pure function
//! of (catalog, calendar month) — two calls in the same month yield
//! identical, order-stable output.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The provider quota: exactly this many sports are polled per cycle
/// whenever the catalog can supply them. An external API constraint,
/// not a modeling choice — change it here, not in the selection logic.
pub const TRACKED_SPORT_QUOTA: usize = 8;

/// Seasonality of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// In season every month (year-round tours and event calendars).
    YearRound,
    /// In season only during the listed months (0 = January).
    Months(&'static [u32]),
}

impl Season {
    pub fn contains(&self, month: u32) -> bool {
        match self {
            Season::YearRound => true,
            Season::Months(months) => months.contains(&month),
        }
    }
}

/// One sport in the static catalog. `key` is the opaque provider
/// identifier; `name` is the display label used on picks and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SportDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub season: Season,
}

impl SportDescriptor {
    pub fn in_season(&self, month: u32) -> bool {
        self.season.contains(month)
    }
}

/// Priority-ordered sport catalog.
///
/// Tier 1: long-season or year-round sports. Tier 2: seasonal sports
/// that fill slots while active. Tier 3: alternates used to pad the
/// tracked set when tiers 1–2 leave gaps (summer, mostly).
pub const SPORT_CATALOG: &[SportDescriptor] = &[
    // Tier 1
    SportDescriptor { key: "basketball_nba", name: "NBA", season: Season::Months(&[0, 1, 2, 3, 4, 5, 9, 10, 11]) },
    SportDescriptor { key: "icehockey_nhl", name: "NHL", season: Season::Months(&[0, 1, 2, 3, 4, 9, 10, 11]) },
    SportDescriptor { key: "basketball_ncaab", name: "NCAAB", season: Season::Months(&[0, 1, 2, 3, 10, 11]) },
    SportDescriptor { key: "soccer_epl", name: "EPL", season: Season::Months(&[0, 1, 2, 3, 4, 7, 8, 9, 10, 11]) },
    SportDescriptor { key: "tennis_atp", name: "Tennis ATP", season: Season::YearRound },
    SportDescriptor { key: "baseball_mlb", name: "MLB", season: Season::Months(&[3, 4, 5, 6, 7, 8, 9, 10]) },
    // Tier 2
    SportDescriptor { key: "americanfootball_nfl", name: "NFL", season: Season::Months(&[8, 9, 10, 11, 0, 1]) },
    SportDescriptor { key: "americanfootball_ncaaf", name: "NCAAF", season: Season::Months(&[8, 9, 10, 11, 0]) },
    // Tier 3
    SportDescriptor { key: "basketball_wnba", name: "WNBA", season: Season::Months(&[4, 5, 6, 7, 8, 9]) },
    SportDescriptor { key: "soccer_usa_mls", name: "MLS", season: Season::Months(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]) },
    SportDescriptor { key: "golf_masters_tournament_winner", name: "Golf", season: Season::YearRound },
    SportDescriptor { key: "mma_mixed_martial_arts", name: "UFC/MMA", season: Season::YearRound },
    SportDescriptor { key: "basketball_euroleague", name: "EuroLeague", season: Season::Months(&[0, 1, 2, 3, 4, 9, 10, 11]) },
    SportDescriptor { key: "soccer_uefa_champs_league", name: "Champions League", season: Season::Months(&[0, 1, 2, 3, 4, 8, 9, 10, 11]) },
];

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The sports to poll this cycle, under the default quota.
pub fn tracked_sports(month: u32) -> Vec<&'static SportDescriptor> {
    tracked_sports_with_quota(month, TRACKED_SPORT_QUOTA)
}

/// Quota-parameterized selection over the static catalog.
///
/// 1. Take the in-season subset in catalog priority order.
/// 2. Exactly at quota → done; above → drop the lowest-priority excess.
/// 3. Below quota → pad with unselected alternates: year-round entries
///    first (catalog order), then any remaining in-season seasonal
///    entries, stopping at quota. If the catalog cannot supply a full
///    set, the shortfall is returned as-is — downstream tolerates
///    fewer than quota.
pub fn tracked_sports_with_quota(month: u32, quota: usize) -> Vec<&'static SportDescriptor> {
    let in_season: Vec<&SportDescriptor> = SPORT_CATALOG
        .iter()
        .filter(|s| s.in_season(month))
        .collect();

    if in_season.len() >= quota {
        return in_season.into_iter().take(quota).collect();
    }

    let mut selected = in_season;

    let alternates: Vec<&SportDescriptor> = SPORT_CATALOG
        .iter()
        .filter(|s| !selected.iter().any(|sel| sel.key == s.key))
        .collect();

    // Year-round alternates fill gaps in any month.
    for sport in alternates.iter().filter(|s| s.season == Season::YearRound) {
        if selected.len() >= quota {
            break;
        }
        selected.push(sport);
    }

    // Then seasonal alternates, only while actually in season.
    for sport in alternates.iter().filter(|s| s.season != Season::YearRound) {
        if selected.len() >= quota {
            break;
        }
        if sport.in_season(month) {
            selected.push(sport);
        }
    }

    selected
}

// ---------------------------------------------------------------------------
// Schedule info (display)
// ---------------------------------------------------------------------------

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One row of the tracked-sports schedule, for display consumers.
#[derive(Debug, Clone, Serialize)]
pub struct SportSchedule {
    pub key: &'static str,
    pub name: &'static str,
    /// Comma-joined month names, or "Year-round".
    pub months_label: String,
    pub in_season: bool,
}

/// Schedule rows for the sports tracked in the given month.
pub fn schedule_info(month: u32) -> Vec<SportSchedule> {
    tracked_sports(month)
        .into_iter()
        .map(|sport| {
            let months_label = match sport.season {
                Season::YearRound => "Year-round".to_string(),
                Season::Months(months) => months
                    .iter()
                    .map(|&m| MONTH_NAMES[m as usize])
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            SportSchedule {
                key: sport.key,
                name: sport.name,
                months_label,
                in_season: sport.in_season(month),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

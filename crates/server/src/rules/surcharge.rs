//! Victim surcharge lookup.
//!
//! The offence date selects one of six bands; within a band the offender's
//! age at offence selects the adult or youth sub-table, and the disposal
//! (plus fine amount or custodial term) selects the cell. Offences before
//! 2012-10-01 carry no surcharge.

use chrono::NaiveDate;
use shared_types::SentenceType;

use super::date;

/// Adult cells: 0 conditional discharge, 1 fine floor (0.10 bands only),
/// 2 fine cap, 3 community/YRO, 4 suspended <=6m, 5 suspended >6m,
/// 6 custody <=6m, 7 custody 6-24m, 8 custody >24m.
struct SurchargeBand {
    adult: [f64; 9],
    /// 0 conditional discharge, 1 fine/community/YRO, 2 custody or suspended.
    youth: [f64; 3],
    fine_pct: f64,
}

fn band_for(offence_date: NaiveDate) -> Option<SurchargeBand> {
    if offence_date < date(2012, 10, 1) {
        return None;
    }

    let band = if offence_date >= date(2022, 6, 16) {
        SurchargeBand {
            adult: [26.0, 0.0, 2000.0, 114.0, 154.0, 187.0, 154.0, 187.0, 228.0],
            youth: [20.0, 26.0, 41.0],
            fine_pct: 0.40,
        }
    } else if offence_date >= date(2020, 4, 14) {
        SurchargeBand {
            adult: [22.0, 34.0, 190.0, 95.0, 128.0, 156.0, 128.0, 156.0, 190.0],
            youth: [17.0, 22.0, 34.0],
            fine_pct: 0.10,
        }
    } else if offence_date >= date(2019, 6, 28) {
        SurchargeBand {
            adult: [21.0, 32.0, 181.0, 90.0, 122.0, 149.0, 122.0, 149.0, 181.0],
            youth: [16.0, 21.0, 32.0],
            fine_pct: 0.10,
        }
    } else if offence_date >= date(2016, 4, 8) {
        SurchargeBand {
            adult: [20.0, 30.0, 170.0, 85.0, 115.0, 140.0, 115.0, 140.0, 170.0],
            youth: [15.0, 20.0, 30.0],
            fine_pct: 0.10,
        }
    } else {
        SurchargeBand {
            adult: [15.0, 20.0, 120.0, 60.0, 80.0, 100.0, 80.0, 100.0, 120.0],
            youth: [10.0, 15.0, 20.0],
            fine_pct: 0.10,
        }
    };
    Some(band)
}

/// Victim surcharge in GBP for the given disposal.
pub fn victim_surcharge(
    offence_date: NaiveDate,
    age_at_offence: u8,
    sentence_type: SentenceType,
    fine_amount: Option<f64>,
    custodial_term_months: Option<f64>,
) -> f64 {
    let Some(band) = band_for(offence_date) else {
        return 0.0;
    };

    let adult = age_at_offence >= 18;
    if !adult {
        return match sentence_type {
            SentenceType::ConditionalDischarge => band.youth[0],
            SentenceType::Fine
            | SentenceType::YouthRehabilitationOrder
            | SentenceType::CommunityOrder => band.youth[1],
            st if st.is_custodial() || st == SentenceType::SuspendedSentenceOrder => band.youth[2],
            _ => 0.0,
        };
    }

    match sentence_type {
        SentenceType::ConditionalDischarge => band.adult[0],
        SentenceType::Fine => {
            let Some(fine) = fine_amount else {
                return 0.0;
            };
            let amount = (fine * band.fine_pct).round();
            if band.fine_pct == 0.40 {
                band.adult[2].min(amount)
            } else {
                band.adult[2].min(band.adult[1].max(amount))
            }
        }
        SentenceType::CommunityOrder | SentenceType::YouthRehabilitationOrder => band.adult[3],
        SentenceType::SuspendedSentenceOrder => {
            let months = custodial_term_months.unwrap_or(0.0);
            if months <= 6.0 {
                band.adult[4]
            } else {
                band.adult[5]
            }
        }
        st if st.is_custodial() => {
            let months = custodial_term_months.unwrap_or(0.0);
            if months <= 6.0 {
                band.adult[6]
            } else if months <= 24.0 {
                band.adult[7]
            } else {
                band.adult[8]
            }
        }
        _ => 0.0,
    }
}

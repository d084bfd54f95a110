use tracing::debug;

use super::{Criterion, CriterionKind, MOTOR_START_FACTOR, Threshold, Verdict};
use crate::catalog::InverterSpec;

/// Grades an inverter against the AC load it must carry.
///
/// Criteria, in order:
/// 1. `max_ac_output >= total_ac_load_w`
/// 2. `surge >= largest_motor_w * 3`
pub fn evaluate_inverter(
    inverter: &InverterSpec,
    total_ac_load_w: f64,
    largest_motor_w: f64,
) -> Verdict {
    let verdict = Verdict::from_criteria(vec![
        Criterion::check(
            CriterionKind::AcOutput,
            inverter.max_ac_output,
            Threshold::AtLeast {
                limit: total_ac_load_w,
            },
        ),
        Criterion::check(
            CriterionKind::SurgeCapacity,
            inverter.surge,
            Threshold::AtLeast {
                limit: largest_motor_w * MOTOR_START_FACTOR,
            },
        ),
    ]);
    debug!(
        inverter = inverter.id,
        acceptable = verdict.acceptable,
        "inverter evaluated"
    );
    verdict
}

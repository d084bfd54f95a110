use tracing::debug;

use super::{
    Criterion, CriterionKind, ISC_SAFETY_MARGIN, MIN_POWER_SHARE, Threshold, VOC_SAFETY_MARGIN,
    Verdict,
};
use crate::array::ArrayOutput;
use crate::catalog::ControllerSpec;

/// Grades a charge controller against an array.
///
/// Criteria, in order:
/// 1. `max_voltage > voc * 1.2`
/// 2. `max_current >= isc * 1.25`
/// 3. `max_power >= power * 0.8` (nameplate power)
/// 4. `mppt_min <= voltage <= mppt_max`
pub fn evaluate_controller(controller: &ControllerSpec, array: &ArrayOutput) -> Verdict {
    let criteria = vec![
        Criterion::check(
            CriterionKind::VoltageSafety,
            controller.max_voltage,
            Threshold::Above {
                limit: array.voc * VOC_SAFETY_MARGIN,
            },
        ),
        Criterion::check(
            CriterionKind::CurrentRating,
            controller.max_current,
            Threshold::AtLeast {
                limit: array.isc * ISC_SAFETY_MARGIN,
            },
        ),
        Criterion::check(
            CriterionKind::PowerCapacity,
            controller.max_power,
            Threshold::AtLeast {
                limit: array.power * MIN_POWER_SHARE,
            },
        ),
        Criterion::check(
            CriterionKind::MpptWindow,
            array.voltage,
            Threshold::Within {
                min: controller.mppt_min,
                max: controller.mppt_max,
            },
        ),
    ];

    let verdict = Verdict::from_criteria(criteria);
    debug!(
        controller = controller.id,
        acceptable = verdict.acceptable,
        failed = verdict.failed().count(),
        "controller evaluated"
    );
    verdict
}

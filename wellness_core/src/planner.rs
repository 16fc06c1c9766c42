//! Course grade requirement and risk-ranking engine.
//!
//! For each course the engine computes the weighted current grade, the
//! average needed on remaining work to reach the target, and a risk tier.
//! A batch of courses is then ranked into a strict priority order, most
//! urgent first.

use crate::summary::round1;
use crate::{Course, CourseEvaluation, Error, EvaluationRequest, RankingResult, Result, RiskTier};

/// Upper bound of the grading scale
pub const MAX_GRADE: f64 = 100.0;

/// Weight total representing a fully specified course
pub const FULL_WEIGHT: f64 = 100.0;

/// Weight totals beyond this are rejected as input errors rather than
/// evaluated degenerately
const WEIGHT_TOTAL_CAP: f64 = 200.0;

/// Tolerance for float dust when weights should sum exactly
const WEIGHT_EPSILON: f64 = 1e-9;

/// Configurable risk thresholds
///
/// The boundary between Watch and Critical is a policy choice, so it lives
/// here instead of in the rule table.
#[derive(Clone, Copy, Debug)]
pub struct RiskPolicy {
    /// Points above target at which a required average turns Critical
    pub critical_margin: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            critical_margin: 10.0,
        }
    }
}

/// Weighted figures accumulated over one course's assessments
#[derive(Clone, Copy, Debug)]
struct Standing {
    graded_weight: f64,
    weighted_sum: f64,
    total_weight: f64,
    remaining_weight: f64,
}

fn standing(course: &Course) -> Standing {
    let mut listed_weight = 0.0;
    let mut graded_weight = 0.0;
    let mut weighted_sum = 0.0;

    for assessment in &course.assessments {
        listed_weight += assessment.weight;
        if let Some(grade) = assessment.grade {
            graded_weight += assessment.weight;
            weighted_sum += assessment.weight * grade;
        }
    }

    // A course listing less than the full scale carries the shortfall as
    // ungraded weight, so it can be evaluated before every assessment is known
    let total_weight = listed_weight.max(FULL_WEIGHT);
    let remaining_weight = (total_weight - graded_weight).max(0.0);

    Standing {
        graded_weight,
        weighted_sum,
        total_weight,
        remaining_weight,
    }
}

/// Inputs to the risk rules for a course with remaining weight
#[derive(Clone, Copy, Debug)]
struct RiskFigures {
    required: f64,
    target: f64,
    critical_cutoff: f64,
}

/// Ordered risk rules; first match wins, no match means OnTrack
const RISK_RULES: &[(fn(&RiskFigures) -> bool, RiskTier)] = &[
    (|f| f.required > MAX_GRADE, RiskTier::Unrealistic),
    (|f| f.required > f.critical_cutoff, RiskTier::Critical),
    (|f| f.required > f.target, RiskTier::Watch),
];

fn classify(figures: &RiskFigures) -> RiskTier {
    for (matches, tier) in RISK_RULES {
        if matches(figures) {
            return *tier;
        }
    }
    RiskTier::OnTrack
}

/// Evaluate a single course against the risk policy
///
/// ## Computation
///
/// 1. **Current grade**: sum of `weight * grade` over graded assessments,
///    divided by the graded weight. None when nothing is graded yet.
/// 2. **Required average**: `(target * total - weighted_sum) / remaining`,
///    where `total` is the listed weight or the full scale, whichever is
///    larger. None once nothing remains.
/// 3. **Risk**: with remaining weight the rule table applies; with none the
///    settled final grade alone decides between Achieved and Unrealistic.
///
/// A course with no assessments at all is classified Watch with the target
/// itself as the required average; there is nothing to extrapolate from yet.
///
/// Callers are expected to `validate` the batch first; evaluation itself
/// never fails.
pub fn evaluate_course(course: &Course, policy: &RiskPolicy) -> CourseEvaluation {
    if course.assessments.is_empty() {
        return CourseEvaluation {
            course: course.name.clone(),
            target_grade: course.target_grade,
            current_grade: None,
            completed_weight: 0.0,
            remaining_weight: FULL_WEIGHT,
            required_average: Some(course.target_grade),
            risk: RiskTier::Watch,
        };
    }

    let figures = standing(course);

    let current_grade = if figures.graded_weight > WEIGHT_EPSILON {
        Some(figures.weighted_sum / figures.graded_weight)
    } else {
        None
    };

    if figures.remaining_weight <= WEIGHT_EPSILON {
        // Everything graded: the outcome is settled either way
        let final_grade = figures.weighted_sum / figures.total_weight;
        let risk = if final_grade >= course.target_grade {
            RiskTier::Achieved
        } else {
            RiskTier::Unrealistic
        };
        return CourseEvaluation {
            course: course.name.clone(),
            target_grade: course.target_grade,
            current_grade,
            completed_weight: figures.graded_weight,
            remaining_weight: 0.0,
            required_average: None,
            risk,
        };
    }

    let required = (course.target_grade * figures.total_weight - figures.weighted_sum)
        / figures.remaining_weight;

    let risk = classify(&RiskFigures {
        required,
        target: course.target_grade,
        critical_cutoff: course.target_grade + policy.critical_margin,
    });

    CourseEvaluation {
        course: course.name.clone(),
        target_grade: course.target_grade,
        current_grade,
        completed_weight: figures.graded_weight,
        remaining_weight: figures.remaining_weight,
        required_average: Some(required),
        risk,
    }
}

/// Validate a ranking request before evaluation
///
/// Rejects the whole batch on the first offending course or assessment.
/// Silent clamping would corrupt the weighted-average math invisibly, so
/// out-of-range values are errors.
pub fn validate(request: &EvaluationRequest) -> Result<()> {
    for course in &request.courses {
        if course.name.trim().is_empty() {
            return Err(Error::InvalidCourse {
                course: course.name.clone(),
                reason: "course name is empty".into(),
            });
        }

        if !course.target_grade.is_finite()
            || !(0.0..=MAX_GRADE).contains(&course.target_grade)
        {
            return Err(Error::InvalidCourse {
                course: course.name.clone(),
                reason: format!("target grade {} outside [0, 100]", course.target_grade),
            });
        }

        let mut weight_total = 0.0;
        for assessment in &course.assessments {
            if !assessment.weight.is_finite()
                || assessment.weight <= 0.0
                || assessment.weight > FULL_WEIGHT
            {
                return Err(Error::InvalidAssessment {
                    course: course.name.clone(),
                    assessment: assessment.name.clone(),
                    reason: format!("weight {} outside (0, 100]", assessment.weight),
                });
            }

            if let Some(grade) = assessment.grade {
                if !grade.is_finite() || !(0.0..=MAX_GRADE).contains(&grade) {
                    return Err(Error::InvalidAssessment {
                        course: course.name.clone(),
                        assessment: assessment.name.clone(),
                        reason: format!("grade {} outside [0, 100]", grade),
                    });
                }
            }

            weight_total += assessment.weight;
        }

        if weight_total > WEIGHT_TOTAL_CAP {
            return Err(Error::InvalidCourse {
                course: course.name.clone(),
                reason: format!(
                    "assessment weights total {}, beyond any grading scale",
                    weight_total
                ),
            });
        }
    }

    Ok(())
}

/// One course with its batch priority attached
#[derive(Clone, Debug)]
pub struct RankedCourse {
    /// 1-based rank, most urgent first
    pub priority: u32,
    pub evaluation: CourseEvaluation,
}

/// Validate and rank a batch, keeping the full evaluation figures
///
/// Courses are ordered by risk severity descending, ties broken by required
/// average descending (a settled course sorts after any open one), and full
/// ties keep their submission order.
pub fn rank_detailed(
    request: &EvaluationRequest,
    policy: &RiskPolicy,
) -> Result<Vec<RankedCourse>> {
    validate(request)?;

    let mut evaluations: Vec<CourseEvaluation> = request
        .courses
        .iter()
        .map(|course| evaluate_course(course, policy))
        .collect();

    // Stable sort preserves submission order across full ties
    evaluations.sort_by(|a, b| {
        b.risk.severity().cmp(&a.risk.severity()).then_with(|| {
            let ra = a.required_average.unwrap_or(f64::NEG_INFINITY);
            let rb = b.required_average.unwrap_or(f64::NEG_INFINITY);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    Ok(evaluations
        .into_iter()
        .enumerate()
        .map(|(index, evaluation)| RankedCourse {
            priority: (index + 1) as u32,
            evaluation,
        })
        .collect())
}

/// Validate and rank a batch into the wire response shape
///
/// Reported averages are rounded to one decimal place; classification and
/// ordering always use the exact values.
pub fn rank_courses(
    request: &EvaluationRequest,
    policy: &RiskPolicy,
) -> Result<Vec<RankingResult>> {
    let ranked = rank_detailed(request, policy)?;

    Ok(ranked
        .into_iter()
        .map(|ranked| RankingResult {
            course: ranked.evaluation.course,
            priority: ranked.priority,
            risk: ranked.evaluation.risk,
            required_average: ranked.evaluation.required_average.map(round1),
        })
        .collect())
}

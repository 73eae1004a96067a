// Integration tests for ScholarMatch

use scholarmatch::models::{
    AcademicCriteria, ApplicationRequirements, CompetitionStats, CriteriaInput,
    DemographicCriteria, EligibilityCriteria, FinancialNeed, OverallAssessment, Scholarship,
    StudentProfile,
};
use scholarmatch::{
    compute_eligibility_analysis, compute_match_score, compute_match_scores_batch, BatchRunner,
    EngineConfig, EngineError,
};
use std::time::{Duration, Instant};

fn example_student() -> StudentProfile {
    StudentProfile {
        gpa: Some(4.0),
        sat_score: Some(1600),
        gender: Some("Male".to_string()),
        intended_major: Some("Biology".to_string()),
        volunteer_hours: Some(150.0),
        financial_need: Some(FinancialNeed::High),
        first_generation: Some(true),
        ..Default::default()
    }
}

fn varied_scholarships(count: usize) -> Vec<Scholarship> {
    (0..count)
        .map(|i| {
            let criteria = match i % 4 {
                0 => CriteriaInput::Json("{}".to_string()),
                1 => CriteriaInput::Json(format!(r#"{{"academic": {{"minGPA": "{}"}}}}"#, 3.0 + (i % 10) as f64 * 0.1)),
                2 => CriteriaInput::Typed(EligibilityCriteria {
                    demographic: Some(DemographicCriteria {
                        required_gender: Some("Female".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                _ => CriteriaInput::Value(serde_json::json!({
                    "majorField": {"eligibleMajors": ["Biology", "Chemistry"]},
                    "experience": {"minVolunteerHours": 100},
                })),
            };
            let mut scholarship = Scholarship::new(criteria)
                .with_id(format!("sch-{i:03}"))
                .with_award(500.0 * (i % 8 + 1) as f64);
            scholarship.requirements = ApplicationRequirements {
                essay_count: (i % 3) as u32,
                ..Default::default()
            };
            scholarship.competition = CompetitionStats {
                acceptance_rate: Some(0.02 + (i % 5) as f64 * 0.1),
                ..Default::default()
            };
            scholarship
        })
        .collect()
}

#[test]
fn test_example_gender_mismatch_costs_fifteen_points() {
    let scholarship = Scholarship::new(CriteriaInput::Json(
        r#"{"demographic": {"requiredGender": "Female"}}"#.to_string(),
    ));
    let score = compute_match_score(Some(&example_student()), &scholarship).unwrap();

    assert_eq!(score.dimensions.demographic_score, 0);
    assert!((83..=87).contains(&score.overall_match_score));
    assert_eq!(score.overall_match_score, 85);
    // failing a dimension outright caps the chance of winning
    assert!(score.success_probability <= 5);
}

#[test]
fn test_example_missing_profile() {
    let scholarship = Scholarship::default();
    assert_eq!(
        compute_match_score(None, &scholarship).unwrap_err(),
        EngineError::MissingProfile
    );
    assert_eq!(
        compute_eligibility_analysis(None, &scholarship).unwrap_err(),
        EngineError::MissingProfile
    );
}

#[test]
fn test_example_empty_criteria() {
    for criteria in [
        CriteriaInput::Json("{}".to_string()),
        CriteriaInput::Json("   ".to_string()),
        CriteriaInput::Value(serde_json::Value::Null),
        CriteriaInput::Typed(EligibilityCriteria::default()),
    ] {
        let score = compute_match_score(Some(&example_student()), &Scholarship::new(criteria)).unwrap();
        assert_eq!(score.overall_match_score, 100);
        for (_, dimension) in score.dimensions.iter() {
            assert_eq!(dimension, 100);
        }
    }
}

#[test]
fn test_example_gpa_shortfall() {
    let profile = StudentProfile {
        gpa: Some(3.3),
        ..Default::default()
    };
    let scholarship = Scholarship::new(EligibilityCriteria {
        academic: Some(AcademicCriteria {
            min_gpa: Some(3.5),
            ..Default::default()
        }),
        ..Default::default()
    });

    let score = compute_match_score(Some(&profile), &scholarship).unwrap();
    assert_eq!(score.dimensions.academic_score, 94);
    assert!(score.overall_match_score > 85 && score.overall_match_score < 100);

    let analysis = compute_eligibility_analysis(Some(&profile), &scholarship).unwrap();
    assert_eq!(analysis.overall_score, score.overall_match_score);
    assert_eq!(analysis.gap_analysis.missing_criteria.len(), 1);
    assert_eq!(analysis.recommendations[0], "Raise your GPA by 0.2 to reach 3.5");
    assert_eq!(analysis.overall_assessment, OverallAssessment::Competitive);
}

#[test]
fn test_malformed_json_is_an_error() {
    let scholarship = Scholarship::new(CriteriaInput::Json(r#"{"academic": {"minGPA": }"#.to_string()));
    let result = compute_match_score(Some(&example_student()), &scholarship);
    assert!(matches!(result, Err(EngineError::MalformedCriteria(_))));
}

#[test]
fn test_json_and_typed_criteria_agree() {
    let typed = Scholarship::new(EligibilityCriteria {
        academic: Some(AcademicCriteria {
            min_gpa: Some(3.5),
            min_sat: Some(1400),
            ..Default::default()
        }),
        ..Default::default()
    });
    let json = Scholarship::new(CriteriaInput::Json(
        r#"{"academic": {"min_gpa": 3.5, "minSAT": "1400"}, "unknownKey": true}"#.to_string(),
    ));

    let a = compute_match_score(Some(&example_student()), &typed).unwrap();
    let b = compute_match_score(Some(&example_student()), &json).unwrap();
    assert_eq!(a.dimensions, b.dimensions);
    assert_eq!(a.overall_match_score, b.overall_match_score);
}

#[test]
fn test_scholarship_payload_round_trips_through_serde() {
    let raw = r#"{
        "id": "stem-women",
        "name": "Women in STEM",
        "awardAmount": "2500",
        "criteria": "{\"demographic\":{\"requiredGender\":\"Female\"}}",
        "requirements": {"essayCount": 2, "recommendationCount": 1},
        "competition": {"applicantPoolSize": 400, "awardsAvailable": 20}
    }"#;
    let scholarship: Scholarship = serde_json::from_str(raw).unwrap();
    assert_eq!(scholarship.award_amount, Some(2500.0));

    let score = compute_match_score(Some(&example_student()), &scholarship).unwrap();
    // 20 / 400 = 0.05
    assert_eq!(score.competition_factor, 0.85);

    let body = serde_json::to_value(&score).unwrap();
    assert_eq!(body["scholarshipId"], "stem-women");
    assert_eq!(body["demographicScore"], 0);
    assert!(body.get("calculatedAt").is_some());
}

#[tokio::test]
async fn test_batch_preserves_order_and_matches_single_scoring() {
    let scholarships = varied_scholarships(100);
    let profile = example_student();

    let expected: Vec<u8> = scholarships
        .iter()
        .map(|s| compute_match_score(Some(&profile), s).unwrap().overall_match_score)
        .collect();

    let runner = BatchRunner::new(EngineConfig {
        batch_workers: Some(6),
        ..Default::default()
    });
    let scores = runner.run(Some(&profile), scholarships).await.unwrap();

    assert_eq!(scores.len(), 100);
    for (i, score) in scores.iter().enumerate() {
        assert_eq!(score.scholarship_id.as_deref(), Some(format!("sch-{i:03}").as_str()));
        assert_eq!(score.overall_match_score, expected[i]);
    }
}

#[tokio::test]
async fn test_batch_of_100_is_fast() {
    let scholarships = varied_scholarships(100);
    let started = Instant::now();
    let scores = compute_match_scores_batch(Some(&example_student()), scholarships)
        .await
        .unwrap();
    assert_eq!(scores.len(), 100);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_abandoned_batch_does_not_block_later_work() {
    let profile = example_student();
    {
        let batch = compute_match_scores_batch(Some(&profile), varied_scholarships(500));
        // dropped before completion
        let _ = tokio::time::timeout(Duration::from_micros(1), batch).await;
    }

    let scores = compute_match_scores_batch(Some(&profile), varied_scholarships(10))
        .await
        .unwrap();
    assert_eq!(scores.len(), 10);
}

use paperforge::domain::{ExamDocument, ModelIssue, QuestionType};

use crate::helpers::{sample_exam, sample_exam_json};

#[test]
fn given_exam_json_when_decoding_then_wire_names_map_to_fields() {
    let exam = sample_exam();

    assert_eq!(exam.duration_minutes, Some(60));
    assert_eq!(exam.sections.len(), 2);
    assert_eq!(exam.sections[0].questions[0].question_type, QuestionType::MultipleChoice);
    assert_eq!(exam.question_count(), 2);
}

#[test]
fn given_exam_when_serializing_then_optional_fields_are_omitted() {
    let exam = sample_exam();
    let value = serde_json::to_value(&exam).unwrap();

    assert!(value.get("subtitle").is_none());
    assert_eq!(value["totalScore"], 10);
    assert_eq!(value["sections"][0]["questions"][0]["type"], "multiple_choice");
    assert!(value["sections"][0]["questions"][0].get("imageUrl").is_none());
}

#[test]
fn given_unknown_fields_when_decoding_then_ignored() {
    let json = r#"{"title":"T","subject":"S","sections":[],"watermark":"x"}"#;
    let exam: ExamDocument = serde_json::from_str(json).unwrap();

    assert!(exam.sections.is_empty());
    assert!(exam.inspect().is_empty());
}

#[test]
fn given_consistent_exam_when_inspecting_then_no_issues() {
    assert!(sample_exam().inspect().is_empty());
}

#[test]
fn given_section_score_mismatch_when_inspecting_then_reported() {
    let mut exam = sample_exam();
    exam.sections[0].total_score = 5;

    let issues = exam.inspect();

    assert!(issues.contains(&ModelIssue::SectionScoreMismatch {
        section: "选择题".to_string(),
        declared: 5,
        actual: 4,
    }));
    assert!(issues.contains(&ModelIssue::ExamScoreMismatch {
        declared: 10,
        actual: 11,
    }));
}

#[test]
fn given_options_on_fill_in_blank_when_inspecting_then_reported() {
    let mut exam = sample_exam();
    exam.sections[1].questions[0].options = Some(vec!["A".to_string()]);

    assert_eq!(
        exam.inspect(),
        vec![ModelIssue::UnexpectedOptions {
            question_id: 2,
            question_type: QuestionType::FillInBlank,
        }]
    );
}

#[test]
fn given_choice_question_with_answer_lines_when_inspecting_then_reported() {
    let mut exam = sample_exam();
    exam.sections[0].questions[0].answer_space_lines = Some(3);

    assert_eq!(
        exam.inspect(),
        vec![ModelIssue::UnexpectedAnswerSpace {
            question_id: 1,
            question_type: QuestionType::MultipleChoice,
        }]
    );
}

#[test]
fn given_duplicate_ids_when_inspecting_then_reported() {
    let mut exam = sample_exam();
    exam.sections[1].questions[0].id = 1;
    exam.sections[1].questions[0].number = 1;

    let issues = exam.inspect();

    assert!(issues.contains(&ModelIssue::DuplicateQuestionId(1)));
    assert!(issues.contains(&ModelIssue::DuplicateQuestionNumber(1)));
}

#[test]
fn given_exam_when_normalizing_blanks_then_only_fill_in_blank_text_changes() {
    let json = sample_exam_json().replace("What is 2+2?", "Pick one ( )");
    let mut exam: ExamDocument = serde_json::from_str(&json).unwrap();

    exam.normalize_blanks();

    assert_eq!(exam.sections[0].questions[0].text, "Pick one ( )");
    assert_eq!(exam.sections[1].questions[0].text, "3 + 5 = （ ______________ ）");
}

#[test]
fn given_unknown_question_type_when_round_tripping_then_label_kept() {
    let json = r#"{"title":"T","subject":"S","sections":[{"title":"阅读","totalScore":2,
        "questions":[{"id":1,"number":1,"text":"读一读","type":"reading","score":2}]}]}"#;

    let exam: ExamDocument = serde_json::from_str(json).unwrap();
    let question = &exam.sections[0].questions[0];
    assert_eq!(question.question_type, QuestionType::Other("reading".to_string()));
    assert!(exam.inspect().is_empty());

    let value = serde_json::to_value(&exam).unwrap();
    assert_eq!(value["sections"][0]["questions"][0]["type"], "reading");
}

#[test]
fn given_nulls_and_loose_scalars_when_decoding_then_defaults_and_coercions_applied() {
    let json = r#"{"title":null,"subject":3,"grade":"三年级","durationMinutes":"45",
        "sections":[{"title":"判断题","totalScore":1.4,"questions":null}]}"#;

    let exam: ExamDocument = serde_json::from_str(json).unwrap();

    assert_eq!(exam.title, "");
    assert_eq!(exam.subject, "3");
    assert_eq!(exam.duration_minutes, Some(45));
    assert_eq!(exam.sections[0].total_score, 1);
    assert!(exam.sections[0].questions.is_empty());
}

#[test]
fn given_questions_without_ids_when_filling_numbers_then_positions_used() {
    let json = r#"{"title":"T","subject":"S","sections":[
        {"title":"A","totalScore":2,"questions":[{"text":"q1","type":"essay","score":1},
                                               {"id":9,"number":5,"text":"q2","type":"essay","score":1}]},
        {"title":"B","totalScore":1,"questions":[{"id":-3,"text":"q3","type":"essay","score":1}]}]}"#;
    let mut exam: ExamDocument = serde_json::from_str(json).unwrap();

    exam.fill_missing_numbers();

    let ids: Vec<(u32, u32)> = exam.questions().map(|q| (q.id, q.number)).collect();
    assert_eq!(ids, vec![(1, 1), (9, 5), (3, 3)]);
}

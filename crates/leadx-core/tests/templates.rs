use leadx_core::error::ValidationError;
use leadx_core::templates::{
    canned_suggestions, create_template, detect_variables, duplicate_template, insert_variable,
    known_category, saved_message, sms_segments, TemplateDraft,
};
use leadx_core::types::TemplateKind;

#[test]
fn variables_are_distinct_in_first_seen_order() {
    assert_eq!(
        detect_variables("", "Hi {{name}}, {{name}} at {{company}}"),
        vec!["name", "company"]
    );
    assert_eq!(
        detect_variables("Welcome, {{name}}", "Use {{link}} or {{name}}"),
        vec!["name", "link"]
    );
    assert!(detect_variables("", "{{ spaced }} and {name}").is_empty());
}

#[test]
fn sms_segments_count_characters() {
    assert_eq!(sms_segments(""), 1);
    assert_eq!(sms_segments(&"a".repeat(160)), 1);
    assert_eq!(sms_segments(&"a".repeat(161)), 2);
    assert_eq!(sms_segments(&"é".repeat(320)), 2);
}

#[test]
fn insert_variable_appends_placeholder() {
    assert_eq!(insert_variable("Hi ", "name"), "Hi {{name}}");
}

#[test]
fn categories_resolve_per_kind() {
    assert_eq!(known_category(Some(TemplateKind::Email), "win-back"), Some("Win-back"));
    assert_eq!(known_category(Some(TemplateKind::Email), "Reminder"), None);
    assert_eq!(known_category(None, " reminder "), Some("Reminder"));
    assert_eq!(known_category(None, "Transactional"), Some("Transactional"));
    assert_eq!(known_category(None, "Webinar"), None);
}

#[test]
fn draft_validation_order() {
    let mut draft = TemplateDraft::new(TemplateKind::Email);
    assert_eq!(draft.validate(), Err(ValidationError::TitleRequired));

    draft.title = "Welcome".to_string();
    assert_eq!(draft.validate(), Err(ValidationError::SubjectRequired));

    draft.subject = "Hello {{name}}".to_string();
    assert_eq!(draft.validate(), Err(ValidationError::BodyRequired));

    draft.body = "Body for {{company}}".to_string();
    assert_eq!(draft.validate(), Ok(()));

    let mut sms = TemplateDraft::new(TemplateKind::Sms);
    sms.title = "Ping".to_string();
    assert_eq!(sms.validate(), Err(ValidationError::BodyRequired));
}

#[test]
fn saving_a_draft_collects_variables() {
    let mut draft = TemplateDraft::new(TemplateKind::Email);
    draft.title = "  Welcome  ".to_string();
    draft.subject = "Hi {{name}}".to_string();
    draft.body = "Thanks for joining {{company}}, {{name}}.".to_string();

    let template = draft.save().unwrap();
    assert_eq!(template.title, "Welcome");
    assert_eq!(template.variables, vec!["name", "company"]);
    assert_eq!(template.category, "Nurture");
    assert_eq!(template.last_edited, "Just now");
    assert_eq!(saved_message(&template), "\"Welcome\" saved with 2 variable(s).");
}

#[test]
fn sms_subject_is_ignored_for_variables() {
    let mut draft = TemplateDraft::new(TemplateKind::Sms);
    draft.subject = "{{ignored}}".to_string();
    draft.body = "Hi {{name}}".to_string();
    assert_eq!(draft.variables(), vec!["name"]);
}

#[test]
fn quick_create_defaults() {
    assert_eq!(
        create_template(TemplateKind::Sms, " ", "", "").unwrap_err(),
        ValidationError::TitleRequired
    );

    let template = create_template(TemplateKind::Sms, "Flash sale", "", "").unwrap();
    assert_eq!(template.category, "Marketing");
    assert_eq!(template.preview, "No content yet.");
    assert!(template.variables.is_empty());

    let email = create_template(TemplateKind::Email, "Intro", "Sales", "Hi {{name}}").unwrap();
    assert_eq!(email.category, "Sales");
    assert_eq!(email.variables, vec!["name"]);
}

#[test]
fn duplicate_gets_new_id_and_copy_suffix() {
    let original = create_template(TemplateKind::Email, "Intro", "Sales", "Hi {{name}}").unwrap();
    let copy = duplicate_template(&original);

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.title, "Intro (Copy)");
    assert_eq!(copy.variables, original.variables);
    assert_eq!(copy.last_edited, "Just now");
}

#[test]
fn suggestions_fill_subject_only_for_email() {
    let email = canned_suggestions(TemplateKind::Email);
    assert_eq!(email.len(), 3);

    let mut draft = TemplateDraft::new(TemplateKind::Email);
    draft.apply_suggestion(&email[0]);
    assert_eq!(draft.subject, "Welcome aboard, {{name}}!");
    assert_eq!(draft.variables(), vec!["name", "company"]);

    let sms = canned_suggestions(TemplateKind::Sms);
    let mut sms_draft = TemplateDraft::new(TemplateKind::Sms);
    sms_draft.apply_suggestion(&sms[0]);
    assert!(sms_draft.subject.is_empty());
    assert_eq!(sms_draft.sms_segments(), 1);
}

//! Request validation.
//!
//! Validators walk the raw JSON body and collect every violation before
//! responding, one issue per violated rule: unknown fields are rejected,
//! missing/mistyped/out-of-range fields are tagged, and cross-field rules
//! (date ordering, age monotonicity, offence selector) report at the
//! document root. A typed request is only constructed when the issue list
//! is empty.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use shared_types::{
    CalculateSentenceRequest, ChatTurnRequest, PleaStage, SearchGuidelinesRequest, SentenceType,
    ValidationIssue,
};

const CALCULATE_FIELDS: &[&str] = &[
    "offence_id",
    "offence_query",
    "offence_date",
    "conviction_date",
    "sentence_date",
    "age_at_offence",
    "age_at_conviction",
    "age_at_sentence",
    "plea_stage",
    "sentence_type",
    "culpability",
    "harm",
    "pre_plea_term_months",
    "extension_months",
    "fine_amount",
    "dangerousness_assessed",
    "prior_listed_offence_with_custody",
    "prior_domestic_burglary_count",
    "prior_class_a_trafficking_count",
    "prior_relevant_weapon_conviction",
    "terrorism_flag",
    "minimum_sentence_unjust_or_exceptional",
    "replicate_ace_release_bug",
];

const SEARCH_FIELDS: &[&str] = &["query", "offence_id", "top_k"];

const CHAT_FIELDS: &[&str] = &["message", "offence_id", "offence_query", "calculation", "top_k"];

const MIN_AGE: i64 = 10;
const MAX_AGE: i64 = 120;
const MIN_TOP_K: i64 = 1;
const MAX_TOP_K: i64 = 20;

struct Fields<'a> {
    object: &'a Map<String, Value>,
    prefix: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>, prefix: &[String]) -> Self {
        Self {
            object,
            prefix: prefix.to_vec(),
            issues: Vec::new(),
        }
    }

    fn loc(&self, key: &str) -> Vec<String> {
        let mut loc = self.prefix.clone();
        loc.push(key.to_string());
        loc
    }

    fn push(&mut self, key: &str, msg: impl Into<String>, kind: &str, input: Option<&Value>) {
        let mut issue = ValidationIssue::new(self.loc(key), msg, kind);
        if let Some(value) = input {
            issue = issue.with_input(value.clone());
        }
        self.issues.push(issue);
    }

    fn push_root(&mut self, msg: impl Into<String>, kind: &str) {
        self.issues
            .push(ValidationIssue::new(self.prefix.clone(), msg, kind));
    }

    fn reject_unknown(&mut self, allowed: &[&str]) {
        let unknown: Vec<(String, Value)> = self
            .object
            .iter()
            .filter(|(key, _)| !allowed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in unknown {
            self.push(&key, "Extra inputs are not permitted", "extra_forbidden", Some(&value));
        }
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                let other = other.clone();
                self.push(key, "Input should be a valid string", "string_type", Some(&other));
                None
            }
        }
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        match self.object.get(key) {
            None => {
                self.push(key, "Field required", "missing", None);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                let other = other.clone();
                self.push(key, "Input should be a valid string", "string_type", Some(&other));
                None
            }
        }
    }

    fn required_date(&mut self, key: &str) -> Option<NaiveDate> {
        match self.object.get(key) {
            None => {
                self.push(key, "Field required", "missing", None);
                None
            }
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    let input = Value::String(s.clone());
                    self.push(
                        key,
                        "Input should be a valid ISO-8601 date (YYYY-MM-DD)",
                        "date_parsing",
                        Some(&input),
                    );
                    None
                }
            },
            Some(other) => {
                let other = other.clone();
                self.push(key, "Input should be a valid date", "date_type", Some(&other));
                None
            }
        }
    }

    fn required_age(&mut self, key: &str) -> Option<u8> {
        match self.object.get(key) {
            None => {
                self.push(key, "Field required", "missing", None);
                None
            }
            Some(value) => match value.as_i64() {
                Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Some(age as u8),
                Some(_) => {
                    let input = value.clone();
                    self.push(
                        key,
                        format!("Input should be between {MIN_AGE} and {MAX_AGE}"),
                        "int_range",
                        Some(&input),
                    );
                    None
                }
                None => {
                    let input = value.clone();
                    self.push(key, "Input should be a valid integer", "int_type", Some(&input));
                    None
                }
            },
        }
    }

    fn count_or_zero(&mut self, key: &str) -> u32 {
        match self.object.get(key) {
            None | Some(Value::Null) => 0,
            Some(value) => match value.as_i64() {
                Some(count) if count >= 0 => count as u32,
                Some(_) => {
                    let input = value.clone();
                    self.push(
                        key,
                        "Input should be greater than or equal to 0",
                        "int_range",
                        Some(&input),
                    );
                    0
                }
                None => {
                    let input = value.clone();
                    self.push(key, "Input should be a valid integer", "int_type", Some(&input));
                    0
                }
            },
        }
    }

    fn optional_non_negative_number(&mut self, key: &str) -> Option<f64> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_f64() {
                Some(number) if number >= 0.0 => Some(number),
                Some(_) => {
                    let input = value.clone();
                    self.push(
                        key,
                        "Input should be greater than or equal to 0",
                        "float_range",
                        Some(&input),
                    );
                    None
                }
                None => {
                    let input = value.clone();
                    self.push(key, "Input should be a valid number", "float_type", Some(&input));
                    None
                }
            },
        }
    }

    fn non_negative_number_or(&mut self, key: &str, default: f64) -> f64 {
        self.optional_non_negative_number(key).unwrap_or(default)
    }

    fn bool_or(&mut self, key: &str, default: bool) -> bool {
        match self.object.get(key) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                let other = other.clone();
                self.push(key, "Input should be a valid boolean", "bool_type", Some(&other));
                default
            }
        }
    }

    fn required_plea_stage(&mut self, key: &str) -> Option<PleaStage> {
        self.required_literal(key, &PleaStage::ALL.map(PleaStage::as_str), PleaStage::parse)
    }

    fn required_sentence_type(&mut self, key: &str) -> Option<SentenceType> {
        self.required_literal(key, &SentenceType::ALL.map(SentenceType::as_str), SentenceType::parse)
    }

    fn required_literal<T>(
        &mut self,
        key: &str,
        allowed: &[&str],
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        match self.object.get(key) {
            None => {
                self.push(key, "Field required", "missing", None);
                None
            }
            Some(value) => {
                if let Some(parsed) = value.as_str().and_then(parse) {
                    return Some(parsed);
                }
                let input = value.clone();
                self.push(
                    key,
                    format!("Input should be one of: {}", allowed.join(", ")),
                    "literal_error",
                    Some(&input),
                );
                None
            }
        }
    }

    fn optional_top_k(&mut self, key: &str) -> Option<u32> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_i64() {
                Some(top_k) if (MIN_TOP_K..=MAX_TOP_K).contains(&top_k) => Some(top_k as u32),
                Some(_) => {
                    let input = value.clone();
                    self.push(
                        key,
                        format!("Input should be between {MIN_TOP_K} and {MAX_TOP_K}"),
                        "int_range",
                        Some(&input),
                    );
                    None
                }
                None => {
                    let input = value.clone();
                    self.push(key, "Input should be a valid integer", "int_type", Some(&input));
                    None
                }
            },
        }
    }
}

fn as_object<'v>(body: &'v Value, prefix: &[String]) -> Result<&'v Map<String, Value>, Vec<ValidationIssue>> {
    body.as_object().ok_or_else(|| {
        vec![
            ValidationIssue::new(prefix.to_vec(), "Input should be a valid object", "model_type")
                .with_input(body.clone()),
        ]
    })
}

/// Validate a `/calculate_sentence` body. `require_offence_selector` is
/// relaxed for calculation sub-requests whose enclosing chat turn already
/// carries offence context to inherit.
pub fn parse_calculate_request(
    body: &Value,
    prefix: &[String],
    require_offence_selector: bool,
) -> Result<CalculateSentenceRequest, Vec<ValidationIssue>> {
    let object = as_object(body, prefix)?;
    let mut fields = Fields::new(object, prefix);
    fields.reject_unknown(CALCULATE_FIELDS);

    let offence_id = fields.optional_string("offence_id");
    let offence_query = fields.optional_string("offence_query");

    let offence_date = fields.required_date("offence_date");
    let conviction_date = fields.required_date("conviction_date");
    let sentence_date = fields.required_date("sentence_date");

    let age_at_offence = fields.required_age("age_at_offence");
    let age_at_conviction = fields.required_age("age_at_conviction");
    let age_at_sentence = fields.required_age("age_at_sentence");

    let plea_stage = fields.required_plea_stage("plea_stage");
    let sentence_type = fields.required_sentence_type("sentence_type");

    let culpability = fields.optional_string("culpability");
    let harm = fields.optional_string("harm");

    let pre_plea_term_months = fields.optional_non_negative_number("pre_plea_term_months");
    let extension_months = fields.non_negative_number_or("extension_months", 0.0);
    let fine_amount = fields.optional_non_negative_number("fine_amount");

    let dangerousness_assessed = fields.bool_or("dangerousness_assessed", false);
    let prior_listed_offence_with_custody = fields.bool_or("prior_listed_offence_with_custody", false);
    let prior_domestic_burglary_count = fields.count_or_zero("prior_domestic_burglary_count");
    let prior_class_a_trafficking_count = fields.count_or_zero("prior_class_a_trafficking_count");
    let prior_relevant_weapon_conviction = fields.bool_or("prior_relevant_weapon_conviction", false);
    let terrorism_flag = fields.bool_or("terrorism_flag", false);

    let minimum_sentence_unjust_or_exceptional =
        fields.bool_or("minimum_sentence_unjust_or_exceptional", false);
    let replicate_ace_release_bug = fields.bool_or("replicate_ace_release_bug", true);

    if require_offence_selector && offence_id.is_none() && offence_query.is_none() {
        fields.push_root("Provide either offence_id or offence_query", "value_error");
    }
    if let (Some(offence), Some(conviction)) = (offence_date, conviction_date) {
        if offence > conviction {
            fields.push_root("offence_date must be on or before conviction_date", "value_error");
        }
    }
    if let (Some(conviction), Some(sentence)) = (conviction_date, sentence_date) {
        if conviction > sentence {
            fields.push_root("conviction_date must be on or before sentence_date", "value_error");
        }
    }
    if let (Some(at_offence), Some(at_conviction)) = (age_at_offence, age_at_conviction) {
        if at_conviction < at_offence {
            fields.push_root(
                "age_at_conviction must be greater than or equal to age_at_offence",
                "value_error",
            );
        }
    }
    if let (Some(at_conviction), Some(at_sentence)) = (age_at_conviction, age_at_sentence) {
        if at_sentence < at_conviction {
            fields.push_root(
                "age_at_sentence must be greater than or equal to age_at_conviction",
                "value_error",
            );
        }
    }

    match (
        offence_date,
        conviction_date,
        sentence_date,
        age_at_offence,
        age_at_conviction,
        age_at_sentence,
        plea_stage,
        sentence_type,
    ) {
        (
            Some(offence_date),
            Some(conviction_date),
            Some(sentence_date),
            Some(age_at_offence),
            Some(age_at_conviction),
            Some(age_at_sentence),
            Some(plea_stage),
            Some(sentence_type),
        ) if fields.issues.is_empty() => Ok(CalculateSentenceRequest {
            offence_id,
            offence_query,
            offence_date,
            conviction_date,
            sentence_date,
            age_at_offence,
            age_at_conviction,
            age_at_sentence,
            plea_stage,
            sentence_type,
            culpability,
            harm,
            pre_plea_term_months,
            extension_months,
            fine_amount,
            dangerousness_assessed,
            prior_listed_offence_with_custody,
            prior_domestic_burglary_count,
            prior_class_a_trafficking_count,
            prior_relevant_weapon_conviction,
            terrorism_flag,
            minimum_sentence_unjust_or_exceptional,
            replicate_ace_release_bug,
        }),
        _ => Err(fields.issues),
    }
}

/// Validate a `/search_guidelines` body.
pub fn parse_search_request(body: &Value) -> Result<SearchGuidelinesRequest, Vec<ValidationIssue>> {
    let object = as_object(body, &[])?;
    let mut fields = Fields::new(object, &[]);
    fields.reject_unknown(SEARCH_FIELDS);

    let query = fields.required_string("query");
    let offence_id = fields.optional_string("offence_id");
    let top_k = fields.optional_top_k("top_k");

    match query {
        Some(query) if fields.issues.is_empty() => Ok(SearchGuidelinesRequest {
            query,
            offence_id,
            top_k,
        }),
        _ => Err(fields.issues),
    }
}

/// Validate a `/chat_turn` body, including any nested calculation
/// sub-request under the `calculation` loc prefix.
pub fn parse_chat_request(body: &Value) -> Result<ChatTurnRequest, Vec<ValidationIssue>> {
    let object = as_object(body, &[])?;
    let mut fields = Fields::new(object, &[]);
    fields.reject_unknown(CHAT_FIELDS);

    let message = fields.required_string("message");
    let offence_id = fields.optional_string("offence_id");
    let offence_query = fields.optional_string("offence_query");
    let top_k = fields.optional_top_k("top_k");

    let outer_has_offence = offence_id.is_some() || offence_query.is_some();
    let calculation = match object.get("calculation") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let prefix = vec!["calculation".to_string()];
            match parse_calculate_request(value, &prefix, !outer_has_offence) {
                Ok(calculation) => Some(calculation),
                Err(issues) => {
                    fields.issues.extend(issues);
                    None
                }
            }
        }
    };

    match message {
        Some(message) if fields.issues.is_empty() => Ok(ChatTurnRequest {
            message,
            offence_id,
            offence_query,
            calculation,
            top_k,
        }),
        _ => Err(fields.issues),
    }
}

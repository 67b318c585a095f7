use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};
use crate::models::{Survey, SurveyAuthMode, User};
use crate::session::Session;

pub const MINDSETMETER_BASE: &str = "http://survey.perts.net/take/";

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const DAYS_PER_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

lazy_static! {
    /// Two lowercase words and a phase digit, e.g. `epic shark 1`.
    static ref PHASE_CODE: Regex = Regex::new(r"^([a-z]+ +[a-z]+) +(\d)$").unwrap();
    /// Printable ASCII without spaces, at least five characters.
    static ref IDENTIFIER: Regex = Regex::new(r"^[\x21-\x7e]{5,}$").unwrap();
}

/// Splits a typed phase code into the entry code and its phase number.
/// Input is lowercased first.
pub fn parse_phase_code(input: &str) -> Option<(String, u32)> {
    let lowered = input.to_lowercase();
    let captures = PHASE_CODE.captures(&lowered)?;
    let entry = captures.get(1)?.as_str().to_string();
    let phase = captures.get(2)?.as_str().parse().ok()?;
    Some((entry, phase))
}

pub fn is_valid_identifier(id: &str) -> bool {
    IDENTIFIER.is_match(id)
}

/// Participant id from initials and birthday: `CAM`, November (index 10),
/// 19th gives `CAM.11.19`.
pub fn initials_id(initials: &str, month_index: u32, day: u32) -> String {
    format!("{initials}.{:02}.{:02}", month_index + 1, day)
}

pub fn mindsetmeter_url(url_name: &str, phase: u32, public_key: &str, pid: &str) -> String {
    format!("{MINDSETMETER_BASE}{url_name}?phase={phase}&public_key={public_key}&pid={pid}")
}

/// Which page of the entry flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    EntryCode,
    Identify(SurveyAuthMode),
}

/// Participant entry to a distributed survey: code, then identification,
/// then off to the survey site.
pub struct SurveyEntry {
    session: Session,
    pub mode: EntryMode,
    pub phase_code: String,
    pub entry_code_pattern_valid: bool,
    pub entry_code_valid: bool,
    pub entry_code_submitted: bool,
    pub initials: String,
    /// Zero-based month.
    pub birth_month: u32,
    pub birth_day: u32,
    pub id: String,
    pub identifier_valid: bool,
    survey: Option<Survey>,
    phase: u32,
    public_key: String,
    user: Option<User>,
}

impl SurveyEntry {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            mode: EntryMode::EntryCode,
            phase_code: String::new(),
            entry_code_pattern_valid: true,
            entry_code_valid: false,
            entry_code_submitted: false,
            initials: String::new(),
            birth_month: 0,
            birth_day: 1,
            id: String::new(),
            identifier_valid: true,
            survey: None,
            phase: 0,
            public_key: String::new(),
            user: None,
        }
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Looks the typed code up and moves to identification. A malformed
    /// code or unknown survey leaves the mode unchanged.
    pub async fn submit_code(&mut self) -> ApiResult<()> {
        self.entry_code_valid = false;
        self.entry_code_pattern_valid = true;

        let Some((entry_code, phase)) = parse_phase_code(&self.phase_code) else {
            self.entry_code_pattern_valid = false;
            return Ok(());
        };

        let found = self.session.api().surveys().fetch_by_code(&entry_code).await;
        self.entry_code_submitted = true;
        let Some(survey) = found? else {
            tracing::debug!(code = %entry_code, "no survey for entry code");
            return Ok(());
        };
        self.entry_code_valid = true;

        let phases = survey.public_keys.len() as u32;
        if phase < 1 || phase > phases {
            return Err(ApiError::contract(format!(
                "phase {phase} outside 1..={phases} for survey {}",
                survey.uid
            )));
        }
        self.public_key = survey.public_keys[(phase - 1) as usize].clone();
        self.phase = phase;

        self.user = self.session.current_user();
        self.mode = match self.user {
            Some(_) => EntryMode::Identify(SurveyAuthMode::Msk),
            None => EntryMode::Identify(survey.auth_type),
        };
        self.survey = Some(survey);
        Ok(())
    }

    /// Resolves the participant id and returns the survey URL to open.
    ///
    /// Signed-in users go through with their own uid. Typed ids and
    /// initials are hashed by the server first. Returns `None` when the
    /// typed identifier does not fit the required pattern.
    pub async fn submit_identifier(&mut self) -> ApiResult<Option<String>> {
        let EntryMode::Identify(mode) = self.mode else {
            return Err(ApiError::contract("identifier submitted before an entry code"));
        };
        let url_name = match &self.survey {
            Some(survey) => survey.url_name.clone(),
            None => return Err(ApiError::contract("identifier submitted without a survey")),
        };

        let pid = match mode {
            SurveyAuthMode::Msk => match &self.user {
                Some(user) => user.uid.clone(),
                None => return Err(ApiError::contract("msk identification without a user")),
            },
            SurveyAuthMode::Initials | SurveyAuthMode::Ids => {
                if mode == SurveyAuthMode::Initials {
                    self.id = initials_id(&self.initials, self.birth_month, self.birth_day);
                }
                self.identifier_valid = is_valid_identifier(&self.id);
                if !self.identifier_valid {
                    return Ok(None);
                }
                self.session.api().surveys().hash_mm_id(&self.id).await?
            }
        };
        Ok(Some(mindsetmeter_url(&url_name, self.phase, &self.public_key, &pid)))
    }
}

//! Static reference guide to the twelve English tenses.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenseFormula {
    pub affirmative: &'static str,
    pub negative: &'static str,
    pub yes_no_question: &'static str,
    pub wh_question: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenseDetail {
    pub name: &'static str,
    pub definition: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tobe_formula: Option<TenseFormula>,
    pub regular_formula: TenseFormula,
    pub usage: &'static [&'static str],
    pub signals: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TheorySection {
    pub title: &'static str,
    pub tenses: &'static [TenseDetail],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TheoryGuide {
    pub title: &'static str,
    pub category: &'static str,
    pub introduction: &'static str,
    pub sections: &'static [TheorySection],
}

impl TheoryGuide {
    pub fn tenses(&self) -> impl Iterator<Item = &'static TenseDetail> {
        self.sections.iter().flat_map(|section| section.tenses.iter())
    }
}

const fn formula(
    affirmative: &'static str,
    negative: &'static str,
    yes_no_question: &'static str,
    wh_question: &'static str,
) -> TenseFormula {
    TenseFormula {
        affirmative,
        negative,
        yes_no_question,
        wh_question,
    }
}

const PRESENT: [TenseDetail; 4] = [
    TenseDetail {
        name: "Simple Present",
        definition: "The simple present tense is used to describe habits, general truths, repeated actions, or unchanging situations.",
        tobe_formula: Some(formula(
            "S + am/is/are + O",
            "S + am/is/are + not + O",
            "Am/Is/Are + S + O?",
            "WH- + am/is/are + S + O?",
        )),
        regular_formula: formula(
            "S + V(s/es) + O",
            "S + do/does + not + V-inf + O",
            "Do/Does + S + V-inf + O?",
            "WH- + do/does + S + V-inf + O?",
        ),
        usage: &[
            "General truths: The Earth revolves around the Sun.",
            "Habits or routines: She drinks tea every morning.",
            "Fixed schedules: The train leaves at 8 AM.",
            "Facts: Water boils at 100 degrees Celsius.",
        ],
        signals: &["always", "usually", "often", "sometimes", "every day/week/month", "seldom", "rarely"],
    },
    TenseDetail {
        name: "Present Continuous",
        definition: "The present continuous tense is used for actions happening at the moment of speaking or for temporary actions.",
        tobe_formula: None,
        regular_formula: formula(
            "S + am/is/are + V-ing + O",
            "S + am/is/are + not + V-ing + O",
            "Am/Is/Are + S + V-ing + O?",
            "WH- + am/is/are + S + V-ing + O?",
        ),
        usage: &[
            "Actions happening now: I am studying for my exam.",
            "Temporary situations: He is living in London for a few months.",
            "Future plans (arranged): We are meeting at the cafe tomorrow.",
            "Annoying habits (with \"always\"): You are always losing your keys!",
        ],
        signals: &["now", "right now", "at the moment", "at present", "look!", "listen!"],
    },
    TenseDetail {
        name: "Present Perfect",
        definition: "The present perfect tense is used for actions that happened in the past but have a connection to the present.",
        tobe_formula: None,
        regular_formula: formula(
            "S + have/has + V3/ed + O",
            "S + have/has + not + V3/ed + O",
            "Have/Has + S + V3/ed + O?",
            "WH- + have/has + S + V3/ed + O?",
        ),
        usage: &[
            "Actions that happened at an unspecified time in the past: I have seen that movie.",
            "Life experiences: She has traveled to Japan.",
            "Actions that started in the past and continue to the present: They have lived here for ten years.",
            "Recent past events (with \"just\"): He has just finished his homework.",
        ],
        signals: &["just", "recently", "already", "yet", "ever", "never", "for", "since"],
    },
    TenseDetail {
        name: "Present Perfect Continuous",
        definition: "This tense emphasizes the duration of an action that started in the past and continues to the present.",
        tobe_formula: None,
        regular_formula: formula(
            "S + have/has + been + V-ing + O",
            "S + have/has + not + been + V-ing + O",
            "Have/Has + S + been + V-ing + O?",
            "WH- + have/has + S + been + V-ing + O?",
        ),
        usage: &[
            "To show how long an action has been happening: I have been waiting for two hours.",
            "For actions that recently stopped and have a result in the present: It has been raining, so the ground is wet.",
        ],
        signals: &["for", "since", "all day", "the whole week"],
    },
];

const PAST: [TenseDetail; 4] = [
    TenseDetail {
        name: "Simple Past",
        definition: "The simple past tense is used for actions that started and finished at a specific time in the past.",
        tobe_formula: Some(formula(
            "S + was/were + O",
            "S + was/were + not + O",
            "Was/Were + S + O?",
            "WH- + was/were + S + O?",
        )),
        regular_formula: formula(
            "S + V2/ed + O",
            "S + did + not + V-inf + O",
            "Did + S + V-inf + O?",
            "WH- + did + S + V-inf + O?",
        ),
        usage: &[
            "Completed actions in the past: We went to the cinema yesterday.",
            "A series of completed actions: He woke up, brushed his teeth, and had breakfast.",
            "Past habits: I played soccer when I was a child.",
        ],
        signals: &["yesterday", "last night/week/month", "ago", "in 2010"],
    },
    TenseDetail {
        name: "Past Continuous",
        definition: "The past continuous tense is used for an action that was in progress at a specific time in the past.",
        tobe_formula: None,
        regular_formula: formula(
            "S + was/were + V-ing + O",
            "S + was/were + not + V-ing + O",
            "Was/Were + S + V-ing + O?",
            "WH- + was/were + S + V-ing + O?",
        ),
        usage: &[
            "An action in progress at a specific past time: At 8 PM last night, I was watching TV.",
            "An interrupted action in the past: I was cooking when the phone rang.",
            "Two actions happening at the same time in the past: She was reading while he was playing video games.",
        ],
        signals: &["while", "when", "at that moment", "at 8 PM last night"],
    },
    TenseDetail {
        name: "Past Perfect",
        definition: "The past perfect tense is used to describe an action that happened before another action in the past.",
        tobe_formula: None,
        regular_formula: formula(
            "S + had + V3/ed + O",
            "S + had + not + V3/ed + O",
            "Had + S + V3/ed + O?",
            "WH- + had + S + V3/ed + O?",
        ),
        usage: &[
            "To show the order of two past events: The train had left when I arrived at the station.",
            "With reported speech: She said that she had finished her work.",
        ],
        signals: &["before", "after", "already", "just", "when", "by the time"],
    },
    TenseDetail {
        name: "Past Perfect Continuous",
        definition: "This tense shows the duration of an action that was in progress before another event in the past.",
        tobe_formula: None,
        regular_formula: formula(
            "S + had + been + V-ing + O",
            "S + had + not + been + V-ing + O",
            "Had + S + been + V-ing + O?",
            "WH- + had + S + been + V-ing + O?",
        ),
        usage: &[
            "To show how long a past action was happening before another: He had been working there for five years before he quit.",
            "To show the cause of a past action: I was tired because I had been studying all night.",
        ],
        signals: &["for", "since", "before", "until"],
    },
];

const FUTURE: [TenseDetail; 4] = [
    TenseDetail {
        name: "Simple Future",
        definition: "The simple future tense is used for predictions, promises, or spontaneous decisions about the future.",
        tobe_formula: None,
        regular_formula: formula(
            "S + will + V-inf + O",
            "S + will + not + V-inf + O",
            "Will + S + V-inf + O?",
            "WH- + will + S + V-inf + O?",
        ),
        usage: &[
            "Spontaneous decisions: It's cold. I will close the window.",
            "Predictions or opinions: I think it will rain tomorrow.",
            "Promises: I will help you with your project.",
            "Facts about the future: The sun will rise at 6 AM.",
        ],
        signals: &["tomorrow", "next week/month/year", "in the future", "I think", "probably"],
    },
    TenseDetail {
        name: "Future Continuous",
        definition: "The future continuous tense is used for an action that will be in progress at a specific time in the future.",
        tobe_formula: None,
        regular_formula: formula(
            "S + will be + V-ing + O",
            "S + will not be + V-ing + O",
            "Will + S + be + V-ing + O?",
            "WH- + will + S + be + V-ing + O?",
        ),
        usage: &[
            "Actions in progress at a specific future time: This time next week, I will be relaxing on the beach.",
            "Polite questions about someone's plans: Will you be using the computer for long?",
        ],
        signals: &["this time next week", "at 10 AM tomorrow", "in one year"],
    },
    TenseDetail {
        name: "Future Perfect",
        definition: "The future perfect tense is used to describe an action that will be completed before a specific time in the future.",
        tobe_formula: None,
        regular_formula: formula(
            "S + will have + V3/ed + O",
            "S + will not have + V3/ed + O",
            "Will + S + have + V3/ed + O?",
            "WH- + will + S + have + V3/ed + O?",
        ),
        usage: &[
            "An action completed before a future moment: By 2030, I will have finished my studies.",
            "To express conviction that something has happened: He will have arrived by now.",
        ],
        signals: &["by the time", "by next month", "by 2030", "before"],
    },
    TenseDetail {
        name: "Future Perfect Continuous",
        definition: "This tense emphasizes the duration of an action up to a certain point in the future.",
        tobe_formula: None,
        regular_formula: formula(
            "S + will have been + V-ing + O",
            "S + will not have been + V-ing + O",
            "Will + S + have been + V-ing + O?",
            "WH- + will + S + have been + V-ing + O?",
        ),
        usage: &[
            "To show how long an action will have been happening at a future point: By next year, she will have been teaching for twenty years.",
            "To show the cause of a future situation: My eyes will be tired because I will have been reading for hours.",
        ],
        signals: &["for", "by the time", "by next year"],
    },
];

pub static TENSES_GUIDE: TheoryGuide = TheoryGuide {
    title: "The 12 English Tenses",
    category: "All Tenses",
    introduction: "Here is a complete guide to the 12 main tenses in English, divided into three time frames: Present, Past, and Future. Each time frame has four aspects: Simple, Continuous, Perfect, and Perfect Continuous.",
    sections: &[
        TheorySection {
            title: "I. The Present Tenses",
            tenses: &PRESENT,
        },
        TheorySection {
            title: "II. The Past Tenses",
            tenses: &PAST,
        },
        TheorySection {
            title: "III. The Future Tenses",
            tenses: &FUTURE,
        },
    ],
};

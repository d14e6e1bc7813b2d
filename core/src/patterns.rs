//! Phrase lists and compiled regex tables used by the handoff rules.
//!
//! Phrases are matched by containment against the lower-cased message.
//! Regexes carry `(?i)` and run against the trimmed original message.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) const COMPLAINT_PHRASES: &[&str] = &[
    "discrimination complaint",
    "file complaint",
    "report discrimination",
    "housing discrimination",
    "voucher discrimination",
    "illegal discrimination",
    "complaint about discrimination",
];

pub(crate) const RIGHTS_PHRASES: &[&str] = &[
    "understand my rights",
    "know my rights",
    "understand my options",
    "know my options",
    "what are my rights",
    "what options do i have",
    "help understanding my rights",
    "help with my rights",
    "explain my rights",
    "learn about my rights",
];

pub(crate) const DISCRIMINATION_KEYWORDS: &[&str] = &[
    "discrimination",
    "illegal",
    "unfair",
    "bias",
    "won't take",
    "don't accept",
    "refuse",
    "denied",
    "no longer available when",
    "stop responding when",
    "prefer working professionals",
    "against the law",
    "treated differently",
];

pub(crate) const ASSISTANCE_KEYWORDS: &[&str] = &[
    "help with",
    "assistance with",
    "having trouble with",
    "need help with",
    "having difficulty with",
    "problems with",
    "issues with",
    "speak with",
    "talk to someone",
    "contact someone",
    "get in touch",
    "caseworker",
    "specialist",
    "advisor",
    "counselor",
    "need to speak",
    "need to talk",
    "how do i get in touch",
    "how can i speak",
    "how can i talk",
    "housing specialist",
    "need assistance with",
];

/// Vocabulary of listing searches; these messages belong to the search tools.
pub(crate) const SEARCH_INTENT_KEYWORDS: &[&str] = &["find", "search", "looking", "show", "list"];

/// An explicit ask for a human. Overrides search-intent suppression.
pub(crate) const HUMAN_CONTACT_KEYWORDS: &[&str] = &[
    "talk to",
    "speak with",
    "need someone",
    "talk with",
    "speak to",
    "human",
    "person",
    "caseworker",
    "agent",
    "staff",
    "specialist",
    "having trouble",
    "need help with",
    "assistance with",
];

pub(crate) const BARE_HELP_PHRASES: &[&str] = &["help", "i need help", "need help"];

pub(crate) static COMPLAINT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        &[
            r"(?i)^.*?(file|report|make|submit|lodge)\s+.*?(complaint|report)\s+.*?(discrimination|unfair|illegal)",
            r"(?i)^.*?(complain|report)\s+.*?(discrimination|unfair treatment|illegal)",
            r"(?i)^.*?(help|assist).*?(file|report|make).*?(complaint|discrimination)",
        ],
        "complaint",
    )
});

pub(crate) static ASSISTANCE_REQUEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        &[
            // direct requests
            r"(?i)^.*?(can|could|may|how\s+do|how\s+can)\s+(i|we|you)?\s*(speak|talk|get|connect|reach|contact)\s*(to|with|through)?\s*(someone|anybody|a?\s*person|a?\s*caseworker|a?\s*specialist|a?\s*counselor|a?\s*agent|a?\s*housing\s*specialist)",
            r"(?i)^.*?(need|want|would\s*like|trying)\s*(to)?\s*(speak|talk|get|connect|reach|contact)\s*(to|with|through)?\s*(someone|anybody|a?\s*person|a?\s*caseworker|a?\s*specialist|a?\s*counselor|a?\s*agent|a?\s*housing\s*specialist)",
            r"(?i)^.*?(connect|put|get)\s*(me|us|in\s*touch|through)\s*(with|to)?\s*(someone|anybody|a?\s*person|a?\s*caseworker|a?\s*specialist|a?\s*counselor|a?\s*agent|a?\s*housing\s*specialist)",
            r"(?i)^.*?(is\s*there)?\s*(someone|anybody|a?\s*person|a?\s*caseworker|a?\s*specialist|a?\s*counselor|a?\s*agent|a?\s*housing\s*specialist)\s*(i|we|to)?\s*(can)?\s*(speak|talk|contact|meet)",
            r"(?i)^.*?(how|where|who)\s*(do|can|should)\s*(i|we)?\s*(get|speak|talk|contact|connect|reach|find|meet)",
            r"(?i)^.*?(need|want)\s*(help|assistance)\s*(with|understanding|about|regarding|for)\s*(my|the)?\s*(rights|options|voucher|application)",
            // indirect requests
            r"(?i)^.*?(would|could)\s+it\s+be\s+possible\s+to\s+(speak|talk)\s+(to|with)\s+(someone|anybody|a\s+person|a\s+caseworker|a\s+specialist)",
            r"(?i)^.*?(need|want)\s+(help|assistance)\s+(understanding|with|about|regarding)",
            r"(?i)^.*?(having|got)\s+(trouble|problems|issues|difficulty)\s+with\s+(my|the)\s+(application|paperwork|forms)",
            r"(?i)^.*?(need|want)\s+to\s+(speak|talk)\s+to\s+someone\s+about\s+(my|the)\s+(application|paperwork|forms|voucher|options|rights)",
            // rights and understanding
            r"(?i)^.*?(understand|know)\s+(my|the)\s+(rights|options)",
            r"(?i)^.*?what\s+(are|about)\s+(my|the)\s+(rights|options)",
            r"(?i)^.*?(need|want)\s+(help|assistance)\s+understanding\s+(my|the)\s+(rights|options)",
        ],
        "assistance request",
    )
});

pub(crate) static DISCRIMINATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        &[
            // direct refusal
            r"(?i)^.*?(landlords?|owners?|brokers?|agents?|they|management|building)\s+(won't|will\s+not|refuses?|denied|denying|declined|declining|stopped|wont)\s+(to\s+)?(take|accept|consider|allow|process|approve)\s+(my\s+)?(vouchers?|section\s*8|cityfheps|hasa|applications?)",
            r"(?i)^.*?(said|told|mentioned|implied)\s+(they|he|she|we)?\s*(don't|doesn't|do\s+not|does\s+not|won't|will\s+not)\s+(take|accept|allow|consider)\s+(vouchers?|section\s*8|cityfheps|hasa)",
            r"(?i)^.*?(no|not)\s+(accepting|taking|allowing)\s+(vouchers?|section\s*8|cityfheps|hasa)",
            r"(?i)^.*?broker\s+told\s+me\s+.*?(not|no)\s+(allowed|permitted|accepted)",
            r"(?i)^.*?management\s+company\s+refuses\s+.*?clients",
            // indirect signals
            r"(?i)^.*?(every\s+time|whenever|after|when)\s+.*?(mention|say|tell|bring\s+up).*?(voucher|section\s*8|cityfheps|hasa).*?(no\s+longer|rented|taken|gone|unavailable|different)",
            r"(?i)^.*?(stop(ped)?|quit|cease|won't|don't)\s+(respond|answer|reply|call|contact|get\s+back)",
            r"(?i)^.*?(prefer|want|looking\s+for|only\s+accept)\s+(working|employed|professionals|people\s+with\s+jobs)",
            r"(?i)^.*?(suddenly|keeps?|always)\s+(unavailable|gone|taken|changed|different)",
            r"(?i)^.*?(unit|apartment|place)\s+(was|is|got)\s+(just|recently|suddenly)\s+(rented|taken|unavailable)",
            // trailing-off mentions
            r"(?i)^.*?landlord.*?\.{3}.*?(voucher|section\s*8|cityfheps|hasa)",
            r"(?i)^.*?(voucher|section\s*8|cityfheps|hasa).*?\.{3}.*?landlord",
            r"(?i)^.*?\.{3}.*?(mention|say|tell).*?(voucher|section\s*8|cityfheps|hasa).*?\.{3}$",
            r"(?i)^.*?(when|after).*?(voucher|section\s*8|cityfheps|hasa).*?\.{3}$",
            // HASA
            r"(?i)^.*?(refuses?|won't|will\s+not|don't|do\s+not)\s+(accept|take|allow|consider)\s+hasa\s+(clients|recipients|vouchers?)",
            r"(?i)^.*?(discriminat\w+|bias\w*)\s+.*\s+hasa",
            // general indicators
            r"(?i)^.*?(discriminat\w+|bias\w*)\s+.*\s+(vouchers?|section\s*8|cityfheps|housing)",
            r"(?i)^.*?(illegal(ly)?|against\s+the\s+law)\s+.*\s+(reject\w*|refus\w*|deny\w*)\s+.*\s+(vouchers?|section\s*8|cityfheps|hasa)",
            r"(?i)^.*?(treated\s+differently|unfair\w*)\s+.*\s+because\s+of\s+(my\s+)?(vouchers?|section\s*8|cityfheps|hasa)",
        ],
        "discrimination",
    )
});

fn compile(patterns: &[&str], family: &str) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| compile_one(pattern, family))
        .collect()
}

fn compile_one(pattern: &str, family: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("valid {family} regex {pattern}: {e}"),
    }
}

/// Unicode-safe containment against an already lower-cased message.
pub(crate) fn contains_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

pub(crate) fn matches_any(message: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(message))
}

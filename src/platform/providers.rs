/// A named job board recognised by host.
pub struct Provider {
    pub name: &'static str,
    pub domains: &'static [&'static str],
    pub requires_login: bool,
    pub recommendation: &'static str,
    pub tips: &'static [&'static str],
}

pub const COMPANY_CAREER_PAGE: &str = "Company Career Page";
pub const UNKNOWN_PLATFORM: &str = "Unknown Platform";

pub static JOB_BOARDS: &[Provider] = &[
    Provider {
        name: "LinkedIn",
        domains: &["linkedin.com"],
        requires_login: true,
        recommendation: "LinkedIn often requires login to show the full posting. Copy-paste the description if extraction comes back thin.",
        tips: &[
            "Use the public /jobs/view/ link rather than a feed or search URL",
            "If the page asks you to sign in, paste the description text instead",
        ],
    },
    Provider {
        name: "Indeed",
        domains: &["indeed.com"],
        requires_login: false,
        recommendation: "Indeed works reliably for public job pages.",
        tips: &["Prefer viewjob?jk= links over search result pages"],
    },
    Provider {
        name: "Glassdoor",
        domains: &["glassdoor.com"],
        requires_login: true,
        recommendation: "Glassdoor frequently requires login after a few page views. Copy-paste the description if needed.",
        tips: &["Use the job-listing URL, not the company overview page"],
    },
    Provider {
        name: "Monster",
        domains: &["monster.com"],
        requires_login: false,
        recommendation: "Monster works reliably for public job pages.",
        tips: &[],
    },
    Provider {
        name: "Dice",
        domains: &["dice.com"],
        requires_login: false,
        recommendation: "Dice works reliably for public job pages.",
        tips: &[],
    },
    Provider {
        name: "ZipRecruiter",
        domains: &["ziprecruiter.com"],
        requires_login: false,
        recommendation: "ZipRecruiter postings generally load without login.",
        tips: &["Some postings redirect to the employer's site; use the final link if so"],
    },
    Provider {
        name: "Greenhouse",
        domains: &["greenhouse.io"],
        requires_login: false,
        recommendation: "Greenhouse-hosted postings are well structured and extraction works reliably.",
        tips: &[],
    },
    Provider {
        name: "Lever",
        domains: &["lever.co"],
        requires_login: false,
        recommendation: "Lever-hosted postings are well structured and extraction works reliably.",
        tips: &[],
    },
    Provider {
        name: "Workday",
        domains: &["myworkdayjobs.com"],
        requires_login: false,
        recommendation: "Workday pages render mostly with JavaScript; extraction may be partial.",
        tips: &["If the result is empty, copy-paste the job description text"],
    },
    Provider {
        name: "Wellfound",
        domains: &["wellfound.com", "angel.co"],
        requires_login: true,
        recommendation: "Wellfound often requires login to view full postings.",
        tips: &["Copy-paste the description if the page asks you to log in"],
    },
    Provider {
        name: "SimplyHired",
        domains: &["simplyhired.com"],
        requires_login: false,
        recommendation: "SimplyHired works reliably for public job pages.",
        tips: &[],
    },
];

/// Social platforms are never accepted as job posting sources.
pub static SOCIAL_MEDIA_DOMAINS: &[&str] = &[
    "facebook.com",
    "fb.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "reddit.com",
    "youtube.com",
    "pinterest.com",
    "snapchat.com",
    "threads.net",
];

/// URL fragments that suggest an employer-hosted careers page.
pub static CAREER_PAGE_MARKERS: &[&str] = &["careers", "jobs", "join", "work-at"];

pub const CAREER_PAGE_RECOMMENDATION: &str =
    "Company career pages are usually the most complete source; direct company sites rarely require login.";
pub const CAREER_PAGE_TIPS: &[&str] = &[
    "Link to the individual posting rather than the careers index",
];
pub const UNKNOWN_RECOMMENDATION: &str =
    "This site is not a recognised job board. Extraction will use generic heuristics.";

/// `host` equals `domain` or is one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

pub fn find_job_board(host: &str) -> Option<&'static Provider> {
    JOB_BOARDS
        .iter()
        .find(|provider| provider.domains.iter().any(|d| host_matches(host, d)))
}

pub fn is_social_media(host: &str) -> bool {
    SOCIAL_MEDIA_DOMAINS.iter().any(|d| host_matches(host, d))
}

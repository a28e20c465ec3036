//! 帮助中心：常见问题与联系渠道（静态内容）

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

impl Faq {
    fn matches(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle) || self.answer.to_lowercase().contains(needle)
    }
}

pub const FAQS: [Faq; 5] = [
    Faq {
        question: "How do I file a new claim?",
        answer: "Open \"File a Claim\" from the navigation bar. Choose the disaster and property type, \
                 describe the damage with an estimated loss, then attach photos or documents and submit. \
                 Our team reviews new claims within 24-48 hours.",
    },
    Faq {
        question: "What documents do I need for a claim?",
        answer: "Typical documents are proof of identity, proof of residence, photos of the damage, repair \
                 estimates and any police or incident reports. Images, PDFs and Word documents up to 5 MB \
                 each are accepted.",
    },
    Faq {
        question: "How long does the claim process take?",
        answer: "Most claims are processed within 5-7 business days after all documentation is received. \
                 Complex claims may take longer. You can check the status at any time under \"My Claims\".",
    },
    Faq {
        question: "Can I update an existing claim?",
        answer: "Contact support with your claim number to add information or documents to a claim that \
                 is still pending or under review.",
    },
    Faq {
        question: "What if my claim is denied?",
        answer: "You will receive an explanation of the decision. You may appeal within 30 days by \
                 providing additional documentation or clarification.",
    },
];

/// 按问题或答案做不区分大小写的匹配，空查询返回全部
pub fn search_faqs(query: &str) -> Vec<&'static Faq> {
    let needle = query.trim().to_lowercase();
    FAQS.iter().filter(|faq| needle.is_empty() || faq.matches(&needle)).collect()
}

/// 联系渠道，`href` 为空表示暂未开通
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportChannel {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub href: Option<&'static str>,
}

pub const SUPPORT_CHANNELS: [SupportChannel; 3] = [
    SupportChannel {
        title: "Email Support",
        description: "Get help via email within 24 hours",
        action: "Send Email",
        href: Some("mailto:support@reliefclaim.example"),
    },
    SupportChannel {
        title: "Phone Support",
        description: "Talk to an agent directly",
        action: "Call Now",
        href: Some("tel:+18005550199"),
    },
    SupportChannel {
        title: "Live Chat",
        description: "Chat with support in real time",
        action: "Start Chat",
        href: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_lists_everything() {
        assert_eq!(search_faqs("").len(), FAQS.len());
        assert_eq!(search_faqs("   ").len(), FAQS.len());
    }

    #[test]
    fn test_search_is_case_insensitive_over_answers() {
        let hits = search_faqs("APPEAL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question, "What if my claim is denied?");
    }

    #[test]
    fn test_no_match() {
        assert!(search_faqs("cryptocurrency").is_empty());
    }
}

// tests/classifier_properties.rs
//
// Behavioural properties of the spam pipeline through the public API.
// Policies are built in code so each test states exactly what it relies on.

use contact_form_service::{classify, ContactForm, RejectReason, SpamPolicy, Submission, Verdict};

fn policy() -> SpamPolicy {
    SpamPolicy {
        high_confidence: vec!["seo services".into(), "link building".into()],
        low_confidence: vec!["website redesign".into(), "free quote".into(), "act now".into()],
        minimum_matches: 2,
        blocked_email_domains: vec!["mailinator.com".into()],
        min_meaningful_field_length: 10,
        ..SpamPolicy::default()
    }
    .normalized()
}

fn client(name: &str, email: &str, description: &str) -> Submission {
    Submission::from(ContactForm {
        form_type: "client".into(),
        name: name.into(),
        email: email.into(),
        project_type: "copywriting".into(),
        description: description.into(),
        ..Default::default()
    })
}

fn writer(name: &str, title: &str, logline: &str) -> Submission {
    Submission::from(ContactForm {
        form_type: "writer".into(),
        name: name.into(),
        email: "writer@example.com".into(),
        script_type: "feature".into(),
        script_title: title.into(),
        logline: logline.into(),
        ..Default::default()
    })
}

fn reason(v: &Verdict) -> Option<RejectReason> {
    v.rejection().map(|r| r.reason)
}

#[test]
fn disabled_policy_always_accepts() {
    let p = SpamPolicy {
        enabled: false,
        ..policy()
    };
    let spammy = [
        client("Олена", "x@mailinator.com", "<a href=x>seo services</a>"),
        client("bot", "bot@example.com", "short"),
        writer("http://spam.example", "x", "y"),
    ];
    for s in &spammy {
        assert_eq!(classify(s, &p), Verdict::accept(), "{s:?}");
    }
}

#[test]
fn high_confidence_uses_word_boundaries() {
    let hit = classify(&client("Sam", "sam@example.com", "need seo services?"), &policy());
    assert_eq!(reason(&hit), Some(RejectReason::HighKeyword));
    assert_eq!(hit.rejection().unwrap().detail, "seo services");

    let miss = classify(&client("Sam", "sam@example.com", "video services"), &policy());
    assert!(miss.is_accept());
}

#[test]
fn low_confidence_uses_substrings() {
    let v = classify(&client("Sam", "sam@example.com", "mywebsite redesign"), &policy());
    // One substring hit: below the threshold, delivered with a flag.
    assert!(v.is_accept());
    assert_eq!(
        v.soft_flag().unwrap().matches,
        vec!["website redesign".to_string()]
    );

    // The same phrase as a high-confidence keyword would not match.
    let strict = SpamPolicy {
        high_confidence: vec!["website redesign".into()],
        low_confidence: vec![],
        ..policy()
    };
    assert!(classify(&client("Sam", "sam@example.com", "mywebsite redesign"), &strict)
        .soft_flag()
        .is_none());
    assert!(classify(&client("Sam", "sam@example.com", "mywebsite redesign"), &strict).is_accept());
}

#[test]
fn threshold_boundary() {
    let one = classify(
        &client("Sam", "sam@example.com", "Could you send a free quote?"),
        &policy(),
    );
    assert!(one.is_accept());
    assert_eq!(one.soft_flag().map(|f| f.matches.len()), Some(1));

    let two = classify(
        &client("Sam", "sam@example.com", "Free quote, act now!"),
        &policy(),
    );
    assert_eq!(reason(&two), Some(RejectReason::LowThreshold));
    assert_eq!(two.rejection().unwrap().detail, "2/2 matches: free quote, act now");
}

#[test]
fn domain_blocklist_is_exact() {
    let body = "A long enough project description.";
    let blocked = classify(&client("Sam", "user@mailinator.com", body), &policy());
    assert_eq!(reason(&blocked), Some(RejectReason::BlockedDomain));
    assert_eq!(blocked.rejection().unwrap().detail, "mailinator.com");

    let lookalike = classify(&client("Sam", "user@notmailinator.com", body), &policy());
    assert!(lookalike.is_accept());
}

#[test]
fn one_long_field_clears_gibberish() {
    // 15 characters against a minimum of 10; the short name doesn't matter.
    let ok = classify(&client("Al", "al@example.com", "fifteen chars!!"), &policy());
    assert!(ok.is_accept());

    let short = classify(&client("Al", "al@example.com", "toc2kc"), &policy());
    assert_eq!(reason(&short), Some(RejectReason::BotGibberish));

    let one_long = classify(&writer("Al", "hfp9ky", "A widow hunts her husband's killer."), &policy());
    assert!(one_long.is_accept());
}

#[test]
fn url_check_skips_description() {
    let in_description = classify(
        &client("Sam", "sam@example.com", "Our current site is https://example.com/about"),
        &policy(),
    );
    assert!(in_description.is_accept());

    let in_name = classify(
        &client("https://example.com", "sam@example.com", "A long enough description."),
        &policy(),
    );
    assert_eq!(reason(&in_name), Some(RejectReason::BotUrl));

    let in_logline = classify(
        &writer("Sam", "The Long Road", "Watch it at www.example.com/trailer now"),
        &policy(),
    );
    assert_eq!(reason(&in_logline), Some(RejectReason::BotUrl));
}

#[test]
fn cyrillic_names_only() {
    let body = "A long enough description.";
    let cyr = classify(&client("Олена", "o@example.com", body), &policy());
    assert_eq!(reason(&cyr), Some(RejectReason::BotCyrillic));

    let cjk = classify(&client("李明", "li@example.com", body), &policy());
    assert!(cjk.is_accept());

    // Cyrillic outside the name is not this layer's business.
    let in_body = classify(&client("Sam", "s@example.com", "Привет, нужен сценарий для фильма"), &policy());
    assert!(in_body.is_accept());
}

#[test]
fn classification_is_idempotent() {
    let p = policy();
    let samples = [
        client("Sam", "sam@example.com", "Free quote, act now!"),
        client("Sam", "sam@example.com", "Could you send a free quote?"),
        client("Олена", "o@example.com", "A long enough description."),
        writer("Sam", "The Long Road", "A courier crosses three borders."),
    ];
    for s in &samples {
        assert_eq!(classify(s, &p), classify(s, &p));
    }
}

#[test]
fn earlier_layer_wins() {
    let v = classify(
        &client("Sam", "sam@example.com", r#"<a href="x">need seo services</a> today"#),
        &policy(),
    );
    assert_eq!(reason(&v), Some(RejectReason::BotHtml));

    // Blocked domain beats gibberish and keywords.
    let v = classify(&client("Sam", "x@mailinator.com", "seo services"), &policy());
    assert_eq!(reason(&v), Some(RejectReason::BlockedDomain));

    // Gibberish beats keywords.
    let v = classify(&client("Sam", "sam@example.com", "act now"), &policy());
    assert_eq!(reason(&v), Some(RejectReason::BotGibberish));
}

#[test]
fn shipped_policy_catches_typical_outreach_spam() {
    let cfg = contact_form_service::AppConfig::load_from(std::path::Path::new(
        "config/contact.toml",
    ))
    .expect("shipped config parses");
    let p = cfg.spam;

    let outreach = client(
        "Mark",
        "mark@agency.example",
        "Hi, I came across your website and can get you to the first page of Google.",
    );
    let v = classify(&outreach, &p);
    let r = v.rejection().expect("outreach rejected");
    assert_eq!(r.reason, RejectReason::HighKeyword);
    assert!(r.detail.contains("i came across your website"));
    assert!(r.detail.contains("first page of google"));

    let genuine = client(
        "Adaeze",
        "adaeze@example.com",
        "We are launching a bakery in Lagos and need a short brand story for our About page.",
    );
    assert!(classify(&genuine, &p).is_accept());

    let noreply = client("Shop", "no-reply@shop.example", "Your order confirmation and invoice.");
    assert_eq!(reason(&classify(&noreply, &p)), Some(RejectReason::BlockedPrefix));

    let telegram = client("Sam", "sam@example.com", "Write to me at t.me/fastdeals for details");
    assert_eq!(reason(&classify(&telegram, &p)), Some(RejectReason::BotMessaging));
}

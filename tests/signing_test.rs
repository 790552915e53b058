use percent_encoding::percent_decode_str;
use scrobcli::config::DiscogsConfig;
use scrobcli::discogs::oauth::{
    oauth_params, signature_base_string, signed_query, signing_key,
};
use scrobcli::lastfm::LastfmClient;
use scrobcli::lastfm::scrobble::batch_params;
use scrobcli::types::ScrobbleTrack;
use scrobcli::utils::*;

// Helper function to build owned parameter pairs
fn to_params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn test_config() -> DiscogsConfig {
    DiscogsConfig {
        consumer_key: "ck".to_string(),
        consumer_secret: "cs".to_string(),
        api_url: "https://api.example.com".to_string(),
        authorize_url: "https://www.example.com/oauth/authorize".to_string(),
    }
}

#[test]
fn test_percent_encode_leaves_unreserved_untouched() {
    let unreserved = "AZaz09-._~";
    assert_eq!(percent_encode(unreserved), unreserved);
}

#[test]
fn test_percent_encode_escapes_the_lenient_five() {
    // A default URL encoder leaves these alone; RFC 3986 does not
    assert_eq!(percent_encode("!"), "%21");
    assert_eq!(percent_encode("'"), "%27");
    assert_eq!(percent_encode("("), "%28");
    assert_eq!(percent_encode(")"), "%29");
    assert_eq!(percent_encode("*"), "%2A");
    assert_eq!(percent_encode("!'()*"), "%21%27%28%29%2A");
}

#[test]
fn test_percent_encode_escapes_separators() {
    assert_eq!(percent_encode(" "), "%20");
    assert_eq!(percent_encode("&"), "%26");
    assert_eq!(percent_encode("="), "%3D");
    assert_eq!(percent_encode("+"), "%2B");
    assert_eq!(percent_encode("/"), "%2F");
    assert_eq!(percent_encode("ü"), "%C3%BC");
}

#[test]
fn test_percent_encode_roundtrips_printable_ascii() {
    for byte in 0x20u8..=0x7e {
        let original = (byte as char).to_string();
        let encoded = percent_encode(&original);
        let decoded = percent_decode_str(&encoded)
            .decode_utf8()
            .expect("decodable");
        assert_eq!(decoded, original, "byte 0x{byte:02x} did not round-trip");
    }
}

#[test]
fn test_hmac_sha1_base64_known_vectors() {
    assert_eq!(
        hmac_sha1_base64("The quick brown fox jumps over the lazy dog", "key"),
        "3nybhbi3iqa8ino29wqQcBydtNk="
    );
    assert_eq!(
        hmac_sha1_base64("what do ya want for nothing?", "Jefe"),
        "7/zfauXrL6LSdBbV8YTfnCWafHk="
    );
}

#[test]
fn test_hmac_sha1_base64_is_deterministic_and_key_sensitive() {
    let one = hmac_sha1_base64("message", "key");
    let two = hmac_sha1_base64("message", "key");
    assert_eq!(one, two);

    let other_key = hmac_sha1_base64("message", "other");
    assert_ne!(one, other_key);

    let other_message = hmac_sha1_base64("messagf", "key");
    assert_ne!(one, other_message);
}

#[test]
fn test_md5_hex_known_vectors() {
    assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(
        md5_hex("The quick brown fox jumps over the lazy dog"),
        "9e107d9d372bb6826bd81d3542a419d6"
    );
}

#[test]
fn test_generate_nonce() {
    let nonce = generate_nonce();

    // Millisecond timestamp prefix plus a 12-character tail
    assert!(nonce.len() > 13);
    assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated nonces should be different
    let nonce2 = generate_nonce();
    assert_ne!(nonce, nonce2);
}

#[test]
fn test_parse_track_duration() {
    assert_eq!(parse_track_duration("4:33"), Some(273));
    assert_eq!(parse_track_duration("0:30"), Some(30));
    assert_eq!(parse_track_duration("1:02:03"), Some(3723));
    assert_eq!(parse_track_duration("12:05"), Some(725));
    assert_eq!(parse_track_duration(""), None);
    assert_eq!(parse_track_duration("   "), None);
    assert_eq!(parse_track_duration("abc"), None);
}

#[test]
fn test_signature_base_string_shape() {
    let params = to_params(&[("b", "2"), ("a", "1")]);
    let base = signature_base_string("get", "https://api.example.com/oauth/request_token", &params);

    assert_eq!(
        base,
        "GET&https%3A%2F%2Fapi.example.com%2Foauth%2Frequest_token&a%3D1%26b%3D2"
    );
}

#[test]
fn test_signature_base_string_is_order_insensitive() {
    let url = "https://api.example.com/oauth/identity";
    let forward = to_params(&[("page", "1"), ("per_page", "50"), ("sort", "added")]);
    let shuffled = to_params(&[("sort", "added"), ("page", "1"), ("per_page", "50")]);

    assert_eq!(
        signature_base_string("GET", url, &forward),
        signature_base_string("GET", url, &shuffled)
    );
}

#[test]
fn test_signature_base_string_changes_with_any_parameter() {
    let url = "https://api.example.com/oauth/identity";
    let params = to_params(&[("page", "1"), ("sort", "added")]);
    let base = signature_base_string("GET", url, &params);

    let changed_value = to_params(&[("page", "2"), ("sort", "added")]);
    assert_ne!(base, signature_base_string("GET", url, &changed_value));

    let extra_param = to_params(&[("page", "1"), ("sort", "added"), ("sort_order", "desc")]);
    assert_ne!(base, signature_base_string("GET", url, &extra_param));
}

#[test]
fn test_signing_key_encodes_both_secrets() {
    assert_eq!(signing_key("se&cret", "to ken"), "se%26cret&to%20ken");
    // The token secret is empty for the first handshake leg
    assert_eq!(signing_key("secret", ""), "secret&");
}

#[test]
fn test_oauth_params_contents() {
    let config = test_config();
    let params = oauth_params(&config, Some("tok"));
    let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();

    assert!(keys.contains(&"oauth_consumer_key"));
    assert!(keys.contains(&"oauth_nonce"));
    assert!(keys.contains(&"oauth_signature_method"));
    assert!(keys.contains(&"oauth_timestamp"));
    assert!(keys.contains(&"oauth_version"));
    assert!(keys.contains(&"oauth_token"));
    // The signature is computed over this set, so it cannot be a member
    assert!(!keys.contains(&"oauth_signature"));

    let method = params
        .iter()
        .find(|(k, _)| k == "oauth_signature_method")
        .map(|(_, v)| v.as_str());
    assert_eq!(method, Some("HMAC-SHA1"));

    let without_token = oauth_params(&config, None);
    assert!(!without_token.iter().any(|(k, _)| k == "oauth_token"));
}

#[test]
fn test_oauth_params_regenerate_nonce_per_call() {
    let config = test_config();
    let first = oauth_params(&config, None);
    let second = oauth_params(&config, None);

    let nonce = |params: &[(String, String)]| {
        params
            .iter()
            .find(|(k, _)| k == "oauth_nonce")
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_ne!(nonce(&first), nonce(&second));
}

#[test]
fn test_signed_query_appends_signature_last() {
    let config = test_config();
    let params = to_params(&[("oauth_callback", "http://127.0.0.1:8807/callback/discogs")]);
    let query = signed_query(
        "POST",
        "https://api.example.com/oauth/request_token",
        &params,
        &config,
        None,
    );

    let (last_key, last_value) = query.last().expect("signed set is never empty");
    assert_eq!(last_key, "oauth_signature");
    assert!(!last_value.is_empty());
}

#[test]
fn test_signature_is_deterministic_for_fixed_inputs() {
    // Pin nonce and timestamp by building the parameter set by hand
    let url = "https://api.example.com/oauth/identity";
    let params = to_params(&[
        ("oauth_consumer_key", "ck"),
        ("oauth_nonce", "fixed-nonce"),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", "1700000000"),
        ("oauth_token", "tok"),
        ("oauth_version", "1.0"),
        ("page", "1"),
    ]);
    let key = signing_key("cs", "ts");

    let sign = |params: &[(String, String)]| {
        hmac_sha1_base64(&signature_base_string("GET", url, params), &key)
    };

    assert_eq!(sign(&params), sign(&params));

    let mut altered = params.clone();
    altered.last_mut().unwrap().1 = "2".to_string();
    assert_ne!(sign(&params), sign(&altered));
}

#[test]
fn test_lastfm_signature_matches_reference_concatenation() {
    let params = to_params(&[
        ("method", "auth.getsession"),
        ("api_key", "K"),
        ("token", "tok"),
    ]);
    let expected = md5_hex("api_keyKmethodauth.getsessiontokentokS");

    assert_eq!(LastfmClient::api_signature(&params, "S"), expected);
}

#[test]
fn test_lastfm_signature_excludes_format_and_callback() {
    let base = to_params(&[
        ("method", "auth.getsession"),
        ("api_key", "K"),
        ("token", "tok"),
    ]);
    let with_unsigned = to_params(&[
        ("method", "auth.getsession"),
        ("api_key", "K"),
        ("token", "tok"),
        ("format", "json"),
        ("callback", "http://localhost/cb"),
    ]);

    assert_eq!(
        LastfmClient::api_signature(&base, "S"),
        LastfmClient::api_signature(&with_unsigned, "S")
    );
}

#[test]
fn test_batch_params_index_encoding_preserves_order() {
    let tracks = vec![
        ScrobbleTrack {
            artist: "A".to_string(),
            track: "T1".to_string(),
            album: None,
            timestamp: 100,
        },
        ScrobbleTrack {
            artist: "B".to_string(),
            track: "T2".to_string(),
            album: Some("Al".to_string()),
            timestamp: 200,
        },
    ];

    let expected = to_params(&[
        ("artist[0]", "A"),
        ("track[0]", "T1"),
        ("timestamp[0]", "100"),
        ("artist[1]", "B"),
        ("track[1]", "T2"),
        ("album[1]", "Al"),
        ("timestamp[1]", "200"),
    ]);

    assert_eq!(batch_params(&tracks), expected);
}

#[test]
fn test_batch_params_empty_batch() {
    assert!(batch_params(&[]).is_empty());
}

//! End-to-end: Apex folder -> extractor CSV -> explain against a mock org.

use std::fs;
use std::path::Path;

use apexscan::explain::{explain_csv, ExplainSummary, Explainer};
use apexscan::extractor::{extract_to_csv, Extractor};
use apexscan::auth::{Error as AuthError, ErrorKind as AuthErrorKind};
use apexscan::{
    connect, run_explain, CredentialResolver, ExplainSettings, RunError, RunStage,
    SalesforceCredentials, StaticCredentialResolver,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT_SERVICE: &str = "public with sharing class AccountService {

    public List<Account> recent() {
        return
            [SELECT Id, Name FROM Account WITH SECURITY_ENFORCED];
    }

    public Account byId(Id accountId) {
        return [SELECT Id FROM Account WHERE Id = :accountId];
    }

    public void save(Account a) {
        update a;
        List<List<SObject>> found = [FIND 'Acme' IN ALL FIELDS RETURNING Account(Id)];
    }
}
";

const ACCOUNT_SERVICE_TEST: &str = "@isTest
private class AccountServiceTest {
    @isTest static void recent() {
        insert new Account(Name = 'x');
        System.assertEquals(1, [SELECT COUNT() FROM Account]);
    }
}
";

fn write_class(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn read_rows(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

#[test]
fn test_extractor_csv_shape() {
    let dir = tempfile::tempdir().unwrap();
    let classes = dir.path().join("classes");
    write_class(&classes, "AccountService.cls", ACCOUNT_SERVICE);
    write_class(&classes, "tests/AccountServiceTest.cls", ACCOUNT_SERVICE_TEST);
    write_class(&classes, "AccountService.cls-meta.xml", "<ApexClass/>");

    let output = dir.path().join("soql.csv");
    let count = extract_to_csv(&Extractor::new().unwrap(), &classes, &output).unwrap();
    assert_eq!(count, 3);

    let (headers, rows) = read_rows(&output);
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "class_name",
            "start_linenumber",
            "testClass",
            "has_binding",
            "soql_query",
            "sosl_query",
            "dml_operations",
        ]
    );

    assert_eq!(&rows[0][0], "AccountService.cls");
    assert_eq!(&rows[0][1], "5");
    assert_eq!(&rows[0][2], "false");
    assert_eq!(&rows[0][3], "false");
    assert_eq!(
        &rows[0][4],
        "[SELECT Id, Name FROM Account WITH SECURITY_ENFORCED]"
    );
    assert_eq!(
        &rows[0][5],
        "FIND 'Acme' IN ALL FIELDS RETURNING Account(Id)];"
    );
    assert_eq!(&rows[0][6], "update");

    assert_eq!(&rows[1][1], "9");
    assert_eq!(&rows[1][3], "true");

    assert_eq!(&rows[2][0], "AccountServiceTest.cls");
    assert_eq!(&rows[2][2], "true");
    assert_eq!(&rows[2][6], "insert");
}

#[tokio::test]
async fn test_extract_then_explain() {
    let server = MockServer::start().await;

    // Only the one eligible query reaches the org.
    Mock::given(method("GET"))
        .and(path("/services/data/v60.0/query/"))
        .and(query_param("explain", "SELECT Id, Name FROM Account"))
        .and(header("Authorization", "Bearer 00Dxx!token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "plans": [{
                "cardinality": 12,
                "fields": [],
                "leadingOperationType": "TableScan",
                "relativeCost": 0.5,
                "sobjectCardinality": 12,
                "sobjectType": "Account"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let classes = dir.path().join("classes");
    write_class(&classes, "AccountService.cls", ACCOUNT_SERVICE);
    write_class(&classes, "AccountServiceTest.cls", ACCOUNT_SERVICE_TEST);

    let soql_csv = dir.path().join("soql.csv");
    extract_to_csv(&Extractor::new().unwrap(), &classes, &soql_csv).unwrap();

    let resolver = StaticCredentialResolver::new(SalesforceCredentials::new(
        server.uri(),
        "00Dxx!token",
        "60.0",
    ));
    let client = connect(&resolver, "me@example.com", &ExplainSettings::default())
        .await
        .unwrap();

    let output = dir.path().join("soql_with_explain.csv");
    let report = explain_csv(&Explainer::new(client).unwrap(), &soql_csv, &output)
        .await
        .unwrap();

    assert_eq!(
        report.summary,
        ExplainSummary {
            total: 3,
            dispatched: 1,
            skipped: 2,
            failed: 0,
        }
    );

    let (headers, rows) = read_rows(&output);
    assert_eq!(headers.len(), 9);
    assert_eq!(&headers[7], "modified_soql");
    assert_eq!(&headers[8], "explain_plan");

    assert_eq!(&rows[0][7], "SELECT Id, Name FROM Account");
    let plan: serde_json::Value = serde_json::from_str(&rows[0][8]).unwrap();
    assert_eq!(plan[0]["leadingOperationType"], "TableScan");
    assert!(rows[0][8].contains("\n  {"));

    assert_eq!(&rows[1][8], "");
    assert_eq!(&rows[2][8], "");

    let html = fs::read_to_string(&report.html_path).unwrap();
    assert!(html.contains("SELECT Id, Name FROM Account"));
    assert!(html.contains("TableScan"));
    assert!(!html.contains("AccountServiceTest.cls"));
    assert!(html.contains("Generated by SOQL Explain Plan Tool"));
}

#[tokio::test]
async fn test_unreachable_org_is_recorded_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soql.csv");
    fs::write(
        &input,
        "class_name,start_linenumber,testClass,has_binding,soql_query,sosl_query,dml_operations\r\n\
         A.cls,1,false,false,[SELECT Id FROM Account],,\r\n\
         B.cls,1,false,false,[SELECT Id FROM Contact],,\r\n",
    )
    .unwrap();

    // Nothing listens on the discard port.
    let resolver = StaticCredentialResolver::new(SalesforceCredentials::new(
        "http://127.0.0.1:9",
        "token",
        "60.0",
    ));
    let client = connect(&resolver, "me", &ExplainSettings::default())
        .await
        .unwrap();

    let output = dir.path().join("out.csv");
    let report = explain_csv(&Explainer::new(client).unwrap(), &input, &output)
        .await
        .unwrap();

    assert_eq!(report.summary.failed, 2);
    let (_, rows) = read_rows(&output);
    assert!(rows[0][8].starts_with("Error: "));
    assert!(rows[1][8].starts_with("Error: "));
}

/// Resolver for an org the CLI has never logged into.
struct UnknownOrg;

impl CredentialResolver for UnknownOrg {
    async fn resolve(&self, username: &str) -> apexscan::auth::Result<SalesforceCredentials> {
        Err(AuthError::new(AuthErrorKind::SfdxCli(format!(
            "No authorization information found for {username}."
        ))))
    }
}

#[tokio::test]
async fn test_credential_failure_stops_before_any_explain_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"plans": []})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soql.csv");
    fs::write(
        &input,
        "class_name,start_linenumber,testClass,has_binding,soql_query,sosl_query,dml_operations\r\n\
         A.cls,1,false,false,[SELECT Id FROM Account],,\r\n",
    )
    .unwrap();
    let output = dir.path().join("out.csv");

    let mut stages = Vec::new();
    let err = run_explain(
        &UnknownOrg,
        "nobody@example.com",
        &ExplainSettings::default(),
        &input,
        &output,
        |stage| stages.push(stage),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RunError::Auth(_)));
    assert!(err.to_string().contains("nobody@example.com"));
    assert_eq!(stages, vec![RunStage::Connecting]);
    assert!(!output.exists());
    assert!(!dir.path().join("out.csv.html").exists());
}

#[tokio::test]
async fn test_run_explain_reports_both_stages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v60.0/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"plans": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soql.csv");
    fs::write(
        &input,
        "class_name,start_linenumber,testClass,has_binding,soql_query,sosl_query,dml_operations\r\n\
         A.cls,1,false,false,[SELECT Id FROM Account],,\r\n",
    )
    .unwrap();
    let output = dir.path().join("out.csv");

    let resolver = StaticCredentialResolver::new(SalesforceCredentials::new(
        server.uri(),
        "token",
        "60.0",
    ));
    let mut stages = Vec::new();
    let report = run_explain(
        &resolver,
        "me",
        &ExplainSettings::default(),
        &input,
        &output,
        |stage| stages.push(stage),
    )
    .await
    .unwrap();

    assert_eq!(stages, vec![RunStage::Connecting, RunStage::Processing]);
    assert_eq!(report.summary.dispatched, 1);
    assert!(output.exists());
}

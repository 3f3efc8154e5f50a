use apidocs::cli::CliApp;
use apidocs::Config;
use serde_json::Value;
use tempfile::TempDir;

const SWAGGER: &str = r##"{
    "swagger": "2.0",
    "info": { "title": "Cli", "version": "1" },
    "host": "cli.io",
    "basePath": "/api",
    "paths": {
        "/things": {
            "get": {
                "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Thing" } } }
            }
        }
    },
    "definitions": { "Thing": { "properties": { "email": { "type": "string" } } } }
}"##;

async fn run(args: &[&str]) -> anyhow::Result<()> {
    let matches = CliApp::app().try_get_matches_from(args)?;
    CliApp::run(&matches).await
}

#[tokio::test]
async fn test_normalize_command_writes_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("swagger.json");
    let output = temp_dir.path().join("openapi.yaml");
    std::fs::write(&input, SWAGGER).unwrap();

    run(&[
        "apidocs",
        "normalize",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--format",
        "yaml",
    ])
    .await
    .unwrap();

    let document: Value =
        serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(document["openapi"], "3.1.0");
    assert_eq!(document["servers"][0]["url"], "https://cli.io/api");
    assert!(document["paths"]["/things"]["get"]["responses"]["200"]
        .get("content")
        .is_none());
}

#[tokio::test]
async fn test_mock_command_is_seeded() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("swagger.json");
    std::fs::write(&input, SWAGGER).unwrap();

    let mut outputs = Vec::new();
    for name in ["a.json", "b.json"] {
        let output = temp_dir.path().join(name);
        run(&[
            "apidocs",
            "mock",
            input.to_str().unwrap(),
            "--seed",
            "7",
            "--output",
            output.to_str().unwrap(),
        ])
        .await
        .unwrap();
        outputs.push(std::fs::read_to_string(output).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
    let document: Value = serde_json::from_str(&outputs[0]).unwrap();
    let email = document["paths"]["/things"]["get"]["responses"]["200"]["content"]
        ["application/json"]["examples"]["auto_example"]["value"]["email"]
        .as_str()
        .unwrap();
    assert!(email.contains('@'));
}

#[tokio::test]
async fn test_register_command_persists_resources() {
    let temp_dir = TempDir::new().unwrap();
    let spec_dir = temp_dir.path().join("specs");
    let resource = temp_dir.path().join("resource.yaml");
    std::fs::write(
        &resource,
        format!(
            "metadata:\n  namespace: ns1\n  name: things\nspec:\n  title: Things\n  mock: true\n  specContent: '{}'\n",
            SWAGGER.replace('\n', " ").replace('\'', "''")
        ),
    )
    .unwrap();

    run(&[
        "apidocs",
        "register",
        resource.to_str().unwrap(),
        "--spec-directory",
        spec_dir.to_str().unwrap(),
    ])
    .await
    .unwrap();

    let persisted: Value =
        serde_json::from_str(&std::fs::read_to_string(spec_dir.join("ns1-things.json")).unwrap())
            .unwrap();
    assert_eq!(persisted["openapi"], "3.1.0");
}

#[tokio::test]
async fn test_register_command_reports_failure() {
    let temp_dir = TempDir::new().unwrap();
    let resource = temp_dir.path().join("empty.yaml");
    std::fs::write(&resource, "metadata:\n  namespace: ns\n  name: empty\n").unwrap();

    let result = run(&[
        "apidocs",
        "register",
        resource.to_str().unwrap(),
        "--spec-directory",
        temp_dir.path().join("specs").to_str().unwrap(),
    ])
    .await;

    assert!(result.unwrap_err().to_string().contains("1 registration(s) failed"));
}

#[tokio::test]
async fn test_validate_command() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.json");
    let bad = temp_dir.path().join("bad.json");
    std::fs::write(&good, SWAGGER).unwrap();
    std::fs::write(&bad, r#"{"openapi": "3.0.0"}"#).unwrap();

    assert!(run(&["apidocs", "validate", good.to_str().unwrap()]).await.is_ok());
    assert!(run(&["apidocs", "validate", bad.to_str().unwrap()]).await.is_err());
}

#[tokio::test]
async fn test_init_command_writes_loadable_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apidocs.yaml");

    run(&["apidocs", "init", "--output", path.to_str().unwrap()]).await.unwrap();
    assert_eq!(Config::from_file(&path).unwrap(), Config::default());

    // refuses to clobber without --force
    assert!(run(&["apidocs", "init", "--output", path.to_str().unwrap()]).await.is_err());
    assert!(run(&["apidocs", "init", "--output", path.to_str().unwrap(), "--force"])
        .await
        .is_ok());
}

#[test]
fn test_unknown_format_rejected() {
    let result =
        CliApp::app().try_get_matches_from(["apidocs", "normalize", "x.json", "--format", "xml"]);
    assert!(result.is_err());
}

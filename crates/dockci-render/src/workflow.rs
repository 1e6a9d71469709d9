use std::borrow::Cow;

use dockci_core::{
    CALLER_WORKFLOW_FILE, DeploymentMode, REUSABLE_WORKFLOW_FILE, SECRET_DOCKERHUB_TOKEN,
    SECRET_DOCKERHUB_USERNAME, SharedWorkflow, WorkflowConfig,
};

use crate::output::{Notice, RenderedFile, RenderedWorkflows};

/// Tag expression: `latest` on main, the ref name everywhere else.
const IMAGE_TAG_EXPRESSION: &str = "github.ref_name == 'main' && 'latest' || github.ref_name";

const TRIGGERS: &str = r#"on:
  push:
    branches:
      - main
      - develop
    tags:
      - 'v*'
  workflow_dispatch:
"#;

/// Render every document the config's mode calls for.
pub fn render(config: &WorkflowConfig) -> RenderedWorkflows {
    WorkflowGenerator::new(config).render()
}

/// Generates the workflow documents for one [`WorkflowConfig`].
pub struct WorkflowGenerator<'a> {
    config: &'a WorkflowConfig,
}

impl<'a> WorkflowGenerator<'a> {
    pub fn new(config: &'a WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn render(&self) -> RenderedWorkflows {
        let mode = self.config.mode();
        tracing::debug!(%mode, image = %self.config.image(), "rendering workflows");

        let files = match mode {
            DeploymentMode::Inline => vec![RenderedFile::new(CALLER_WORKFLOW_FILE, self.inline())],
            DeploymentMode::LocalReusable => vec![
                RenderedFile::new(CALLER_WORKFLOW_FILE, self.caller(&local_target())),
                RenderedFile::new(REUSABLE_WORKFLOW_FILE, reusable()),
            ],
            DeploymentMode::RemoteShared => {
                // `shared` is always set for this mode by the builder.
                let target = match self.config.shared() {
                    Some(shared) => remote_target(shared),
                    None => local_target(),
                };
                vec![RenderedFile::new(CALLER_WORKFLOW_FILE, self.caller(&target))]
            }
        };

        let image = self.config.image();
        let notices = if image.was_lowercased() {
            vec![Notice::ImageNameLowercased {
                original: image.original().to_owned(),
                normalized: image.as_str().to_owned(),
            }]
        } else {
            Vec::new()
        };

        RenderedWorkflows {
            mode,
            files,
            notices,
        }
    }

    /// Self-contained build-and-push workflow.
    pub fn inline(&self) -> String {
        let username = expr(&format!("secrets.{SECRET_DOCKERHUB_USERNAME}"));
        let token = expr(&format!("secrets.{SECRET_DOCKERHUB_TOKEN}"));
        let image = self.config.image().as_str();
        let tags = format!(
            "{username}/{image}:{tag}",
            tag = expr(IMAGE_TAG_EXPRESSION),
        );
        // The expressions are safe as a plain scalar; the image name may not be.
        let tags = if is_plain(image) { tags } else { quote(&tags) };

        format!(
            r#"# Generated by dockci ({mode})
name: CI

{TRIGGERS}
jobs:
  build-and-push:
    runs-on: ubuntu-latest
    steps:
{steps}"#,
            mode = DeploymentMode::Inline,
            steps = build_steps(&BuildSteps {
                username: &username,
                password: &token,
                context: &scalar(self.config.context()),
                file: &scalar(self.config.dockerfile()),
                platforms: &scalar(&self.config.platforms().to_string()),
                tags: &tags,
            }),
        )
    }

    /// Caller workflow delegating to the reusable workflow at `target`.
    pub fn caller(&self, target: &str) -> String {
        format!(
            r#"# Generated by dockci ({mode})
name: CI

{TRIGGERS}
jobs:
  docker:
    uses: {target}
    with:
      image-name: {image}
      image-tag: {tag}
      dockerfile-path: {dockerfile}
      build-context: {context}
      platforms: {platforms}
    secrets:
      dockerhub-username: {username}
      dockerhub-token: {token}
"#,
            mode = self.config.mode(),
            target = scalar(target),
            image = scalar(self.config.image().as_str()),
            tag = expr(IMAGE_TAG_EXPRESSION),
            dockerfile = scalar(self.config.dockerfile()),
            context = scalar(self.config.context()),
            platforms = scalar(&self.config.platforms().to_string()),
            username = expr(&format!("secrets.{SECRET_DOCKERHUB_USERNAME}")),
            token = expr(&format!("secrets.{SECRET_DOCKERHUB_TOKEN}")),
        )
    }
}

/// Reusable build-and-push workflow invoked through `workflow_call`.
///
/// Its input defaults are fixed; callers override them per invocation.
pub fn reusable() -> String {
    format!(
        r#"# Generated by dockci ({mode})
name: Docker Build and Push

on:
  workflow_call:
    inputs:
      image-name:
        description: Docker image repository name (lowercase)
        required: true
        type: string
      image-tag:
        description: Tag applied to the pushed image
        required: false
        type: string
        default: latest
      dockerfile-path:
        description: Path to the Dockerfile
        required: false
        type: string
        default: ./Dockerfile
      build-context:
        description: Docker build context
        required: false
        type: string
        default: .
      platforms:
        description: Comma-separated target platforms
        required: false
        type: string
        default: linux/amd64
    secrets:
      dockerhub-username:
        required: true
      dockerhub-token:
        required: true

jobs:
  build-and-push:
    runs-on: ubuntu-latest
    steps:
{steps}"#,
        mode = DeploymentMode::LocalReusable,
        steps = build_steps(&BuildSteps {
            username: &expr("secrets.dockerhub-username"),
            password: &expr("secrets.dockerhub-token"),
            context: &expr("inputs.build-context"),
            file: &expr("inputs.dockerfile-path"),
            platforms: &expr("inputs.platforms"),
            tags: &format!(
                "{}/{}:{}",
                expr("secrets.dockerhub-username"),
                expr("inputs.image-name"),
                expr("inputs.image-tag"),
            ),
        }),
    )
}

/// `uses:` target for the reusable workflow in this repository.
pub fn local_target() -> String {
    format!("./.github/workflows/{REUSABLE_WORKFLOW_FILE}")
}

/// `uses:` target for a reusable workflow hosted in another repository.
pub fn remote_target(shared: &SharedWorkflow) -> String {
    format!(
        "{repo}/.github/workflows/{REUSABLE_WORKFLOW_FILE}@{git_ref}",
        repo = shared.repo,
        git_ref = shared.git_ref,
    )
}

struct BuildSteps<'a> {
    username: &'a str,
    password: &'a str,
    context: &'a str,
    file: &'a str,
    platforms: &'a str,
    tags: &'a str,
}

fn build_steps(s: &BuildSteps<'_>) -> String {
    format!(
        r#"      - name: Checkout
        uses: actions/checkout@v4

      - name: Set up QEMU
        uses: docker/setup-qemu-action@v3

      - name: Set up Docker Buildx
        uses: docker/setup-buildx-action@v3

      - name: Log in to Docker Hub
        uses: docker/login-action@v3
        with:
          username: {username}
          password: {password}

      - name: Build and push
        uses: docker/build-push-action@v6
        with:
          context: {context}
          file: {file}
          platforms: {platforms}
          push: true
          tags: {tags}
"#,
        username = s.username,
        password = s.password,
        context = s.context,
        file = s.file,
        platforms = s.platforms,
        tags = s.tags,
    )
}

/// Wrap a GitHub Actions expression: `expr("inputs.x")` → `${{ inputs.x }}`.
fn expr(inner: &str) -> String {
    format!("${{{{ {inner} }}}}")
}

/// Emit `value` as a YAML scalar, single-quoting anything that would not
/// survive as a plain string.
fn scalar(value: &str) -> Cow<'_, str> {
    if is_plain(value) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(quote(value))
    }
}

/// Whether `value` reads back as the same string when written unquoted.
fn is_plain(value: &str) -> bool {
    const RESERVED: &[&str] = &[
        "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~", ".inf", ".nan",
    ];

    let plain_start = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '.' || c == '/' || c == '_');
    let plain_body = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._/,-+@~".contains(c));
    let reserved = RESERVED.iter().any(|r| r.eq_ignore_ascii_case(value));
    // `.5`, `.5e3` and friends resolve to floats.
    let numeric = value.parse::<f64>().is_ok();

    plain_start && plain_body && !reserved && !numeric
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

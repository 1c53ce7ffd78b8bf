/// Shared test helpers for conform integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use conform_core::config::ConformConfig;
use conform_enforce::context::RepoContext;
use tempfile::TempDir;

#[allow(dead_code)]
pub const SDK_LIBRARY: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Particular.Packaging" Version="4.1.0" PrivateAssets="All" />
  </ItemGroup>
</Project>
"#;

#[allow(dead_code)]
pub const SDK_TESTS: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.9.0" />
    <PackageReference Include="NUnit" Version="4.1.0" />
  </ItemGroup>
</Project>
"#;

#[allow(dead_code)]
pub const SDK_SOURCES: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <IsPackable>true</IsPackable>
    <IncludeBuildOutput>false</IncludeBuildOutput>
    <IncludeSourceFilesInPackage>true</IncludeSourceFilesInPackage>
  </PropertyGroup>
</Project>
"#;

#[allow(dead_code)]
pub const LEGACY_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <OutputType>Library</OutputType>
  </PropertyGroup>
</Project>
"#;

#[allow(dead_code)]
pub const CI_WORKFLOW: &str = r#"name: CI
on:
  push:
    branches:
      - master
      - release-*
  pull_request:
  workflow_dispatch:
env:
  DOTNET_NOLOGO: true
defaults:
  run:
    shell: pwsh
jobs:
  build:
    name: ${{ matrix.name }}
    runs-on: ${{ matrix.os }}
    strategy:
      matrix:
        include:
          - os: windows-latest
            name: Windows
          - os: ubuntu-latest
            name: Linux
      fail-fast: false
    steps:
      - name: Checkout
        uses: actions/checkout@v4.1.1
        with:
          fetch-depth: 0
      - name: Build
        run: dotnet build src --configuration Release
"#;

/// A throwaway repository on disk. Hold it for as long as paths under it
/// are in use.
pub struct FixtureRepo {
    dir: TempDir,
}

#[allow(dead_code)]
impl FixtureRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Build a repository from `(relative_path, content)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let repo = Self::new();
        for (path, content) in files {
            repo.write(path, content);
        }
        repo
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> ConformConfig {
        ConformConfig::new(self.root())
    }

    /// Repository context loaded the way the CLI loads it.
    pub fn context(&self) -> Arc<RepoContext> {
        RepoContext::load(self.config()).unwrap()
    }
}

/// Get path to compiled conform binary.
///
/// Builds the binary if it doesn't exist yet.
#[allow(dead_code)]
pub fn conform_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove 'deps'
    path.push(format!("conform{}", std::env::consts::EXE_SUFFIX));
    if !path.exists() {
        let status = Command::new("cargo")
            .args(["build", "-p", "conform-cli"])
            .current_dir(env!("CARGO_MANIFEST_DIR"))
            .status()
            .expect("Failed to build conform");
        assert!(status.success(), "Failed to build conform binary");
    }
    path
}

/// Run the conform binary against `root` with a clean CI environment.
#[allow(dead_code)]
pub fn conform(root: &Path, args: &[&str]) -> std::process::Output {
    Command::new(conform_bin())
        .args(args)
        .arg("--root")
        .arg(root)
        .env_remove("CI")
        .env_remove("GITHUB_WORKSPACE")
        .env_remove("CONFORM_CONFIG")
        .env_remove("CONFORM_LOG")
        .output()
        .unwrap()
}

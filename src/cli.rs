use std::fs;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};

use courier::config::CourierConfig;
use courier::generator::CodeLanguage;
use courier::history::{HistoryStorage, build_entry, record_history, render_history};
use courier::http::{ApiRequest, BodyType, Client, HttpMethod};
use courier::utils::{ResponseFormat, ResponseFormatter, format_json, is_valid_json, minify_json};
use courier::workspace::WorkspaceStore;
use courier::{export_folder, import_folder};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about = "REST 客户端：管理、发送请求并生成代码", long_about = None)]
pub struct Cli {
    /// 工作区文件，默认取配置中的 workspace.path
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出文件夹和请求
    List,

    /// 新建文件夹
    Folder { name: String },

    /// 在文件夹中新建请求
    Add {
        folder: String,
        name: String,
        url: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: HttpMethod,
        /// "Key: Value"
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// "key=value"
        #[arg(short = 'q', long = "query")]
        query: Vec<String>,
        #[arg(long, default_value = "none")]
        body_type: BodyType,
        #[arg(short = 'd', long = "data")]
        body: Option<String>,
        #[arg(long, conflicts_with = "basic")]
        bearer: Option<String>,
        /// "username:password"
        #[arg(long)]
        basic: Option<String>,
    },

    /// 发送请求 <文件夹>/<请求>
    Send {
        path: String,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        no_history: bool,
    },

    /// 生成代码（curl / swift / python）
    Gen { language: CodeLanguage, path: String },

    /// 复制请求
    Dup { path: String },

    /// 删除请求
    Rm { path: String },

    /// 删除文件夹及其中所有请求
    RmFolder { name: String },

    /// 从导出文件导入文件夹
    Import { file: PathBuf },

    /// 导出文件夹
    Export {
        folder: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 查看请求历史
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        clear: bool,
    },

    /// 格式化 JSON（文件或标准输入）
    Fmt {
        file: Option<PathBuf>,
        #[arg(long)]
        minify: bool,
        /// 只校验，不输出
        #[arg(long)]
        check: bool,
    },
}

pub async fn run(cli: Cli, config: &CourierConfig) -> Result<()> {
    let store = WorkspaceStore::new(
        cli.workspace
            .unwrap_or_else(|| config.workspace.path.clone()),
    );

    match cli.command {
        Commands::List => list(&store),
        Commands::Folder { name } => {
            store.update(|ws| ws.create_folder(&name).map(|_| ()))?;
            println!("Created folder '{}'", name);
            Ok(())
        }
        Commands::Add {
            folder,
            name,
            url,
            method,
            headers,
            query,
            body_type,
            body,
            bearer,
            basic,
        } => {
            let mut request = ApiRequest::new(name, method, url);
            for header in &headers {
                let (key, value) = parse_pair(header, ':')?;
                request = request.with_header(key, value);
            }
            for param in &query {
                let (key, value) = parse_pair(param, '=')?;
                request = request.with_query(key, value);
            }
            if let Some(body) = body {
                // 给了请求体但没指定类型时按 JSON 处理
                let body_type = match body_type {
                    BodyType::None => BodyType::Json,
                    other => other,
                };
                request = request.with_body(body_type, &body);
            }
            if let Some(token) = bearer {
                request = request.with_auth_bearer(&token);
            }
            if let Some(basic) = basic {
                let (username, password) = basic.split_once(':').unwrap_or((basic.as_str(), ""));
                request = request.with_auth_basic(username, password);
            }

            let path = store.update(|ws| {
                ws.add_request(&folder, request)
                    .map(|r| format!("{}/{}", folder, r.name))
            })?;
            println!("Added {}", path);
            Ok(())
        }
        Commands::Send {
            path,
            verbose,
            no_history,
        } => {
            let request = store.load()?.find_request(&path)?.clone();
            let response = Client::new().execute(&request).await?;

            if config.history.enabled && !no_history {
                let storage = HistoryStorage::from_config(&config.history);
                record_history(&storage, &build_entry(&request, &response));
            }

            let format = if verbose {
                ResponseFormat::Verbose
            } else {
                ResponseFormat::Compact
            };
            let formatter =
                ResponseFormatter::new(format).with_color(std::io::stdout().is_terminal());
            println!("{}", formatter.format(&response));
            Ok(())
        }
        Commands::Gen { language, path } => {
            let workspace = store.load()?;
            print!("{}", language.generate(workspace.find_request(&path)?));
            Ok(())
        }
        Commands::Dup { path } => {
            let name = store.update(|ws| ws.duplicate_request(&path).map(|r| r.name.clone()))?;
            println!("Duplicated as '{}'", name);
            Ok(())
        }
        Commands::Rm { path } => {
            store.update(|ws| ws.delete_request(&path))?;
            println!("Deleted {}", path);
            Ok(())
        }
        Commands::RmFolder { name } => {
            let folder = store.update(|ws| ws.delete_folder(&name))?;
            println!(
                "Deleted folder '{}' ({} requests)",
                folder.name,
                folder.requests.len()
            );
            Ok(())
        }
        Commands::Import { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("无法读取文件: {}", file.display()))?;
            let name = store.update(|ws| {
                let folder = import_folder(&bytes, ws.folders.len())?;
                Ok(ws.insert_folder(folder).name.clone())
            })?;
            println!("Imported folder '{}'", name);
            Ok(())
        }
        Commands::Export { folder, output } => {
            let workspace = store.load()?;
            let folder = workspace
                .find_folder(&folder)
                .ok_or_else(|| anyhow!("未找到文件夹: {}", folder))?;
            let bytes = export_folder(folder)?;
            match output {
                Some(path) => {
                    fs::write(&path, &bytes)
                        .with_context(|| format!("无法写入文件: {}", path.display()))?;
                    println!("Exported '{}' to {}", folder.name, path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&bytes)),
            }
            Ok(())
        }
        Commands::History { limit, clear } => {
            let storage = HistoryStorage::from_config(&config.history);
            if clear {
                storage.clear()?;
                println!("History cleared");
                return Ok(());
            }
            let entries = storage.tail(limit)?;
            if entries.is_empty() {
                println!("No history yet");
            } else {
                println!("{}", render_history(&entries));
            }
            Ok(())
        }
        Commands::Fmt {
            file,
            minify,
            check,
        } => {
            let input = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("无法读取文件: {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            if check {
                if !is_valid_json(&input) {
                    bail!("无效的 JSON");
                }
                println!("valid");
                return Ok(());
            }
            let output = if minify {
                minify_json(&input)
            } else {
                format_json(&input)
            };
            println!("{}", output.ok_or_else(|| anyhow!("无效的 JSON"))?);
            Ok(())
        }
    }
}

fn list(store: &WorkspaceStore) -> Result<()> {
    let workspace = store.load()?;
    if workspace.folders.is_empty() {
        println!("Workspace is empty ({})", store.path().display());
        return Ok(());
    }
    for folder in workspace.sorted_folders() {
        println!("{}/", folder.name);
        for request in folder.sorted_requests() {
            println!("  {:<7} {}  {}", request.method, request.name, request.url);
        }
    }
    Ok(())
}

/// 拆分 "key<sep>value"，两侧空白去掉
fn parse_pair(raw: &str, separator: char) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once(separator)
        .ok_or_else(|| anyhow!("参数格式应为 key{}value: {}", separator, raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("参数名不能为空: {}", raw);
    }
    Ok((key, value.trim()))
}

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::algebra::scale_factor;
use crate::app::{AppError, Session};
use crate::dimension::resolve_to_dimension;
use crate::history::ConversionHistory;
use crate::quantity::SiValue;
use crate::registry::DefinitionRegistry;
use crate::relation::Relation;
use crate::render::relation_to_string;
use crate::units::prefix::{
    closest_prefix, next_prefix, prefix_from_name, prefix_from_symbol, prefixes, previous_prefix,
    Prefix,
};

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(name = "dimension_toolbox", version, about = "차원 해석 및 단위 변환 도구")]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 단위 항은 `기호[:접두어[:지수]]` 형식으로 준다. 예: `g:k`, `s::-2`
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 값을 다른 단위식으로 변환한다
    Convert {
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        value: f64,
        #[arg(long, required = true, num_args = 1..)]
        from: Vec<String>,
        #[arg(long, required = true, num_args = 1..)]
        to: Vec<String>,
    },
    /// 단위식을 기본 단위로 해석한다
    Dimension {
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        coefficient: f64,
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// 등록된 단위 목록
    List,
    /// 접두어 목록
    Prefixes,
}

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Convert,
    Dimension,
    Define,
    Delete,
    List,
    History,
    ClearHistory,
    Prefixes,
    BrowsePrefixes,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== Dimension Toolbox ===");
    println!("1) 단위 변환");
    println!("2) 차원 해석");
    println!("3) 단위 정의/수정");
    println!("4) 단위 삭제");
    println!("5) 단위 목록");
    println!("6) 변환 기록");
    println!("7) 변환 기록 지우기");
    println!("8) 접두어 목록");
    println!("9) 접두어 탐색");
    println!("0) 종료");
    loop {
        let sel = read_line("메뉴 선택: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Convert),
            "2" => return Ok(MenuChoice::Dimension),
            "3" => return Ok(MenuChoice::Define),
            "4" => return Ok(MenuChoice::Delete),
            "5" => return Ok(MenuChoice::List),
            "6" => return Ok(MenuChoice::History),
            "7" => return Ok(MenuChoice::ClearHistory),
            "8" => return Ok(MenuChoice::Prefixes),
            "9" => return Ok(MenuChoice::BrowsePrefixes),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// 단위 변환 메뉴를 처리한다.
pub fn handle_conversion(session: &mut Session) -> Result<(), AppError> {
    println!("\n-- 단위 변환 --");
    println!("단위 항은 공백으로 구분한 기호[:접두어[:지수]] 입니다. 예: g:k m s::-2");
    let value = read_f64("값 입력: ")?;
    let src = read_relation(session, 1.0, "입력 단위: ")?;
    let dst = read_relation(session, 1.0, "변환 단위: ")?;
    let author = session.author.clone();
    let target = session.history.convert_and_record(
        &session.registry,
        &author,
        SiValue::from_f64(value),
        &src,
        &dst,
    )?;
    print_conversion(value, &src, target.to_f64(), &dst);
    Ok(())
}

/// 차원 해석 메뉴를 처리한다.
pub fn handle_dimension(session: &mut Session) -> Result<(), AppError> {
    println!("\n-- 차원 해석 --");
    let coefficient = read_f64("계수 (보통 1): ")?;
    let relation = read_relation(session, coefficient, "단위: ")?;
    print_dimension(&session.registry, &relation)
}

/// 단위 정의 메뉴를 처리한다. 이미 있는 기호면 덮어쓸지 묻는다.
pub fn handle_define(session: &mut Session) -> Result<(), AppError> {
    println!("\n-- 단위 정의 --");
    let symbol = read_line("기호 (예: N): ")?.trim().to_string();
    let name = read_line("이름 (예: newton): ")?.trim().to_string();
    let description = read_line("설명: ")?.trim().to_string();
    println!("단위 항을 비워 두면 기본 단위로 등록됩니다.");
    let coefficient = read_f64("계수: ")?;
    let relation = read_relation(session, coefficient, "정의 단위: ")?;

    if session.registry.exists(&symbol) {
        let answer = read_line("이미 있는 기호입니다. 덮어쓸까요? (y/N): ")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("변경하지 않습니다.");
            return Ok(());
        }
        session
            .registry
            .update(&symbol, &name, relation, &description)?;
        println!("'{symbol}' 정의를 수정했습니다.");
    } else {
        session
            .registry
            .create(&symbol, &name, relation, &description)?;
        println!("'{symbol}' 단위를 등록했습니다.");
    }
    Ok(())
}

/// 단위 삭제 메뉴를 처리한다.
pub fn handle_delete(session: &mut Session) -> Result<(), AppError> {
    println!("\n-- 단위 삭제 --");
    let symbol = read_line("삭제할 기호: ")?.trim().to_string();
    if session.registry.delete_by_symbol(&symbol) {
        println!("'{symbol}' 단위를 삭제했습니다.");
    } else {
        println!("'{symbol}' 단위는 정의되어 있지 않습니다.");
    }
    Ok(())
}

/// 접두어 탐색 메뉴. 빈 줄을 입력할 때까지 이전/다음 접두어로 이동한다.
pub fn handle_prefix_browse() -> Result<(), AppError> {
    println!("\n-- 접두어 탐색 --");
    let start = read_line("시작 접두어 (기호 또는 이름, 비우면 배율 1): ")?;
    let Some(mut current) = find_prefix(start.trim()) else {
        println!("알 수 없는 접두어입니다: '{}'", start.trim());
        return Ok(());
    };
    loop {
        let (prev, next) = (previous_prefix(current), next_prefix(current));
        println!(
            "현재: {} ({}, 10^{})   [<] {}   [>] {}",
            current.name,
            display_symbol(current),
            current.log10,
            prev.name,
            next.name
        );
        match read_line("< / > 이동, 엔터 종료: ")?.trim() {
            "<" => current = prev,
            ">" => current = next,
            "" => return Ok(()),
            _ => println!("'<' 또는 '>'를 입력하세요."),
        }
    }
}

/// 기호를 먼저 찾고, 없으면 이름으로 찾는다.
fn find_prefix(input: &str) -> Option<&'static Prefix> {
    prefix_from_symbol(input).or_else(|| prefix_from_name(input))
}

fn display_symbol(prefix: &Prefix) -> &'static str {
    if prefix.symbol.is_empty() {
        "-"
    } else {
        prefix.symbol
    }
}

pub fn print_conversion(value: f64, src: &Relation, converted: f64, dst: &Relation) {
    println!(
        "변환 결과: {value} [{}] = {converted} [{}]",
        relation_to_string(src.units()),
        relation_to_string(dst.units())
    );
}

pub fn print_dimension(registry: &DefinitionRegistry, relation: &Relation) -> Result<(), AppError> {
    let dim = resolve_to_dimension(registry, relation)?;
    println!("입력: {relation}");
    println!("차원: {dim}");
    let scale = scale_factor(&dim);
    let nearest = closest_prefix(scale.abs().log10().floor());
    println!("기본 단위 배율: {scale} (가까운 접두어: {} {})", nearest.name, nearest.symbol);
    Ok(())
}

pub fn print_definitions(registry: &DefinitionRegistry) {
    println!("\n{:<6} {:<12} {:<28} 정의", "기호", "이름", "설명");
    for def in registry.definitions() {
        let relation = if def.is_fundamental() {
            "(기본 단위)".to_string()
        } else {
            def.theoretical_relation.to_string()
        };
        println!(
            "{:<6} {:<12} {:<28} {relation}",
            def.symbol, def.name, def.description
        );
    }
}

pub fn print_history(history: &ConversionHistory) {
    if history.is_empty() {
        println!("변환 기록이 없습니다.");
        return;
    }
    for rec in history.records() {
        println!(
            "[{}] {} {} [{}] = {} [{}]",
            rec.timestamp.format("%Y-%m-%d %H:%M:%S"),
            rec.author,
            rec.initial_value,
            relation_to_string(rec.initial_units.units()),
            rec.target_value,
            relation_to_string(rec.target_units.units())
        );
    }
}

pub fn print_prefixes() {
    for p in prefixes() {
        println!("{:<4} {:<8} 10^{:<4} {:e}", display_symbol(p), p.name, p.log10, p.factor());
    }
}

fn read_relation(session: &Session, coefficient: f64, prompt: &str) -> Result<Relation, AppError> {
    let line = read_line(prompt)?;
    let terms: Vec<&str> = line.split_whitespace().collect();
    session.build_relation(coefficient, &terms)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "입력이 끝났습니다",
        )));
    }
    Ok(buf)
}

fn read_f64(prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

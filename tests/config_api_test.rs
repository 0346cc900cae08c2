// ==========================================
// ConfigApi 集成测试
// ==========================================
// 测试范围:
// 1. 配置查询: 默认值
// 2. 配置更新: 规范化、校验、持久化
// 3. 配置对导入流程的影响
// ==========================================

mod helpers;
mod test_helpers;

use chrono::NaiveDate;
use helpers::api_test_helper::ApiTestEnv;
use ipc_cotacoes::api::ApiError;
use ipc_cotacoes::config::config_keys;
use ipc_cotacoes::Month;
use test_helpers::*;

// ==========================================
// 配置查询测试
// ==========================================

#[test]
fn test_list_configs_初始状态() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.state.config_api.list_configs().expect("查询失败");

    assert_eq!(result.len(), config_keys::ALL.len());
    assert!(result.iter().all(|e| e.is_default), "初始状态应该全部为默认值");

    let regions = result
        .iter()
        .find(|e| e.key == config_keys::REGION_SHEETS)
        .expect("缺少地区配置");
    assert_eq!(regions.value, "SP,RJ,MG,BA,RS,PE,DF");
}

// ==========================================
// 配置更新测试
// ==========================================

#[test]
fn test_update_config_规范化() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let entry = env
        .state
        .config_api
        .update_config(config_keys::REGION_SHEETS, " SP , Goiânia ")
        .expect("更新失败");
    // 只去除空白, 工作表名大小写保持原样
    assert_eq!(entry.value, "SP,Goiânia");
}

#[test]
fn test_update_config_非法值() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let api = &env.state.config_api;

    for (key, value) in [
        (config_keys::REGION_SHEETS, ""),
        (config_keys::REGION_SHEETS, "SP,SP"),
        (config_keys::REGION_SHEETS, "SP,sp"),
        (config_keys::REGION_SHEETS, "RJ,br"),
        (config_keys::HEADER_SKIP_ROWS, "-1"),
        (config_keys::WINDOW_START, "2024-01"),
        (config_keys::LOCALE, "fr"),
        ("ingest/desconhecido", "1"),
    ] {
        let err = api.update_config(key, value).expect_err("应该拒绝非法值");
        assert!(matches!(err, ApiError::InvalidInput(_)), "{} = {:?}", key, value);
    }

    // 非法更新不改变已存配置
    assert!(api.list_configs().expect("查询失败").iter().all(|e| e.is_default));
}

#[test]
fn test_update_config_持久化() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.state.config_api
        .update_config(config_keys::WINDOW_START, "06/2024")
        .expect("更新失败");

    let reopened = env.reopen().expect("无法重新打开");
    let entries = reopened.config_api.list_configs().expect("查询失败");
    let window = entries
        .iter()
        .find(|e| e.key == config_keys::WINDOW_START)
        .expect("缺少窗口配置");
    assert_eq!(window.value, "06/2024");
    assert!(!window.is_default);
}

// ==========================================
// 配置对导入的影响
// ==========================================

#[test]
fn test_window_start_filters_months() {
    let env = ApiTestEnv::with_regions("SP").expect("无法创建测试环境");
    env.state.config_api
        .update_config(config_keys::WINDOW_START, "02/2024")
        .expect("更新失败");

    let path = env.file("cotacoes.xlsx");
    write_quotation_workbook(
        &path,
        &["SP"],
        &["01/2024", "02/2024", "03/2024"],
        &[FixtureItem::new("1001", "Arroz", &[30.0, 40.0, 50.0])],
    )
    .expect("无法生成报价工作簿");

    // 03/2024 晚于参考日期所在月份
    let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
    let response = env
        .state
        .upload_api
        .upload_quotations(&path, today)
        .expect("上传失败");
    assert_eq!(response.months_added, vec![Month::new(2024, 2).unwrap()]);
}

#[test]
fn test_exception_sheet_name_configurable() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.state.config_api
        .update_config(config_keys::EXCEPTION_SHEET, "Outra Aba")
        .expect("更新失败");

    let path = env.file("excecoes.xlsx");
    write_exception_workbook(&path, &[("1", "Café", true)]).expect("无法生成例外工作簿");

    // 默认工作表名不再被识别
    let err = env
        .state
        .upload_api
        .upload_exceptions(&path)
        .expect_err("应该找不到工作表");
    assert!(matches!(err, ApiError::ParseError(_)));
}
